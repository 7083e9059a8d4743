use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::Instruction;
use crate::error::AppError;

/// Body of both the create and the update endpoint.
#[derive(Debug, Deserialize)]
pub struct InstructionRequest {
    pub step_number: i32,
    pub text: String,
}

impl InstructionRequest {
    pub fn validated(self) -> Result<(i32, String), AppError> {
        if self.step_number <= 0 {
            return Err(AppError::validation("step_number must be greater than zero"));
        }
        let text = self.text.trim();
        if text.is_empty() {
            return Err(AppError::validation("text is required"));
        }
        Ok((self.step_number, text.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct InstructionResponse {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub step_number: i32,
    pub text: String,
}

impl From<Instruction> for InstructionResponse {
    fn from(i: Instruction) -> Self {
        Self {
            id: i.id,
            recipe_id: i.recipe_id,
            step_number: i.step_number,
            text: i.text,
        }
    }
}
