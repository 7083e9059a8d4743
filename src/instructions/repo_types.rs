use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One numbered preparation step of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Instruction {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub step_number: i32,
    pub text: String,
}
