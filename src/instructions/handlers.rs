use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{InstructionRequest, InstructionResponse},
    services,
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn instruction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recipes/:id/instructions",
            post(add_instruction).get(list_instructions),
        )
        .route(
            "/recipes/:id/instructions/:instruction_id",
            put(update_instruction).delete(delete_instruction),
        )
}

#[instrument(skip(state))]
pub async fn add_instruction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
    Json(payload): Json<InstructionRequest>,
) -> AppResult<(StatusCode, Json<InstructionResponse>)> {
    let created = services::add_instruction(&state, recipe_id, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn list_instructions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<Vec<InstructionResponse>>> {
    Ok(Json(services::list_instructions(&state, recipe_id, user_id).await?))
}

#[instrument(skip(state))]
pub async fn update_instruction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((recipe_id, instruction_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<InstructionRequest>,
) -> AppResult<StatusCode> {
    services::update_instruction(&state, recipe_id, instruction_id, user_id, payload).await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn delete_instruction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((recipe_id, instruction_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    services::delete_instruction(&state, recipe_id, instruction_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
