use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{MealPlan, MealPlanEntry};
use crate::dates::format_date;

#[derive(Debug, Deserialize)]
pub struct CreateMealPlanRequest {
    pub recipe_id: Uuid,
    pub date: String,
    pub meal_type: String,
    pub target_servings: i32,
}

/// Partial update. Empty or non-positive values leave the field as stored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMealPlanRequest {
    pub recipe_id: Option<Uuid>,
    pub date: Option<String>,
    #[serde(default)]
    pub meal_type: String,
    #[serde(default)]
    pub target_servings: i32,
}

#[derive(Debug, Deserialize)]
pub struct MealPlanQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlannedRecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub servings: i32,
}

#[derive(Debug, Serialize)]
pub struct MealPlanResponse {
    pub id: Uuid,
    pub date: String,
    pub meal_type: String,
    pub target_servings: i32,
    pub recipe: PlannedRecipeSummary,
}

impl MealPlanResponse {
    pub fn from_plan(plan: MealPlan, recipe_name: String, recipe_servings: i32) -> Self {
        Self {
            id: plan.id,
            date: format_date(plan.date),
            meal_type: plan.meal_type,
            target_servings: plan.target_servings,
            recipe: PlannedRecipeSummary {
                id: plan.recipe_id,
                name: recipe_name,
                servings: recipe_servings,
            },
        }
    }
}

impl From<MealPlanEntry> for MealPlanResponse {
    fn from(e: MealPlanEntry) -> Self {
        Self {
            id: e.id,
            date: format_date(e.date),
            meal_type: e.meal_type,
            target_servings: e.target_servings,
            recipe: PlannedRecipeSummary {
                id: e.recipe_id,
                name: e.recipe_name,
                servings: e.recipe_servings,
            },
        }
    }
}
