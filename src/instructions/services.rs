use tracing::{debug, info};
use uuid::Uuid;

use super::{
    dto::{InstructionRequest, InstructionResponse},
    repo_types::Instruction,
};
use crate::{
    error::{AppError, AppResult},
    recipes::services::load_owned_recipe,
    state::AppState,
};

/// Resolve an instruction addressed as `/recipes/:recipe_id/instructions/:id`.
fn belongs_to(instruction: Option<Instruction>, recipe_id: Uuid) -> Option<Instruction> {
    instruction.filter(|i| i.recipe_id == recipe_id)
}

pub async fn add_instruction(
    st: &AppState,
    recipe_id: Uuid,
    user_id: Uuid,
    req: InstructionRequest,
) -> AppResult<InstructionResponse> {
    let (step_number, text) = req.validated()?;
    load_owned_recipe(st.recipes.as_ref(), recipe_id, user_id).await?;
    let created = st.instructions.create(recipe_id, step_number, &text).await?;
    info!(%recipe_id, instruction_id = %created.id, step_number, "instruction added");
    Ok(created.into())
}

pub async fn list_instructions(
    st: &AppState,
    recipe_id: Uuid,
    user_id: Uuid,
) -> AppResult<Vec<InstructionResponse>> {
    load_owned_recipe(st.recipes.as_ref(), recipe_id, user_id).await?;
    let rows = st.instructions.list_by_recipe(recipe_id).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn update_instruction(
    st: &AppState,
    recipe_id: Uuid,
    instruction_id: Uuid,
    user_id: Uuid,
    req: InstructionRequest,
) -> AppResult<()> {
    let (step_number, text) = req.validated()?;
    let found = st.instructions.find_by_id(instruction_id).await?;
    let instruction = belongs_to(found, recipe_id).ok_or(AppError::NotFound("instruction"))?;
    load_owned_recipe(st.recipes.as_ref(), instruction.recipe_id, user_id).await?;
    st.instructions.update(instruction.id, step_number, &text).await?;
    info!(%recipe_id, %instruction_id, "instruction updated");
    Ok(())
}

/// Deleting a step that is already gone succeeds.
pub async fn delete_instruction(
    st: &AppState,
    recipe_id: Uuid,
    instruction_id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    let Some(found) = st.instructions.find_by_id(instruction_id).await? else {
        debug!(%instruction_id, "instruction already absent");
        return Ok(());
    };
    let instruction = belongs_to(Some(found), recipe_id).ok_or(AppError::NotFound("instruction"))?;
    load_owned_recipe(st.recipes.as_ref(), instruction.recipe_id, user_id).await?;
    st.instructions.delete(instruction.id).await?;
    info!(%recipe_id, %instruction_id, "instruction deleted");
    Ok(())
}
