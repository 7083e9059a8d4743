use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Master ingredient; `name` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// Raw `recipe_ingredients` row, without the joined name.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredientRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: f64,
    pub unit: String,
}
