use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::Ingredient;

#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct IngredientMasterResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Ingredient> for IngredientMasterResponse {
    fn from(i: Ingredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddRecipeIngredientRequest {
    pub ingredient_id: Uuid,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeIngredientResponse {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}
