use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::instructions::repo_types::Instruction;

/// Recipe record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub servings: i32, // base servings the quantities are written for
    pub prep_time: i32,
    pub cook_time: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Recipe {
    pub fn total_time(&self) -> i32 {
        self.prep_time + self.cook_time
    }
}

/// One ingredient line of a recipe, with the ingredient's display name resolved.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct IngredientLine {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub ingredients: Vec<IngredientLine>,
    pub instructions: Vec<Instruction>,
}

/// Validated input for creating or replacing a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub servings: i32,
    pub prep_time: i32,
    pub cook_time: i32,
    pub ingredients: Vec<DraftIngredient>,
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}
