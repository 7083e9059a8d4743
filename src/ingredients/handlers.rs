use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        AddRecipeIngredientRequest, CreateIngredientRequest, IngredientMasterResponse,
        RecipeIngredientResponse,
    },
    services,
};
use crate::{
    auth::extractors::AuthUser, error::AppResult, recipes::dto::IngredientResponse,
    state::AppState,
};

pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", post(create_ingredient).get(list_ingredients))
        .route(
            "/recipes/:id/ingredients",
            post(add_recipe_ingredient).get(list_recipe_ingredients),
        )
        .route("/recipe-ingredients/:id", delete(remove_recipe_ingredient))
}

#[instrument(skip(state))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(payload): Json<CreateIngredientRequest>,
) -> AppResult<(StatusCode, Json<IngredientMasterResponse>)> {
    let created = services::create_ingredient(&state, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> AppResult<Json<Vec<IngredientMasterResponse>>> {
    Ok(Json(services::list_ingredients(&state).await?))
}

#[instrument(skip(state))]
pub async fn add_recipe_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
    Json(payload): Json<AddRecipeIngredientRequest>,
) -> AppResult<(StatusCode, Json<RecipeIngredientResponse>)> {
    let line = services::add_to_recipe(&state, recipe_id, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

#[instrument(skip(state))]
pub async fn list_recipe_ingredients(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<Vec<IngredientResponse>>> {
    Ok(Json(services::list_for_recipe(&state, recipe_id, user_id).await?))
}

#[instrument(skip(state))]
pub async fn remove_recipe_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(line_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::remove_from_recipe(&state, line_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
