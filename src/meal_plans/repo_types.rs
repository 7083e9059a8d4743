use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::recipes::repo_types::IngredientLine;

/// A recipe assigned to a date and meal slot for one user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub date: Date,
    pub meal_type: String,      // breakfast / lunch / dinner, free text
    pub target_servings: i32,   // 0 means "as the recipe is written"
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Meal plan joined with the few recipe fields listings need.
#[derive(Debug, Clone, FromRow)]
pub struct MealPlanEntry {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub recipe_servings: i32,
    pub date: Date,
    pub meal_type: String,
    pub target_servings: i32,
}

/// Everything the shopping-list generator needs from one meal plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRecipe {
    pub meal_plan_id: Uuid,
    pub recipe_id: Uuid,
    pub base_servings: i32,
    pub target_servings: i32,
    pub lines: Vec<IngredientLine>,
}

#[derive(Debug, Clone)]
pub struct NewMealPlan {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub date: Date,
    pub meal_type: String,
    pub target_servings: i32,
}
