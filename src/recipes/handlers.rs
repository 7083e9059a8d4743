use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        CreatedRecipeResponse, RecipeDetailResponse, RecipeRequest, RecipeSummary, ScaleQuery,
        ScaledRecipeResponse,
    },
    services::RecipeService,
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe).get(list_recipes))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/recipes/:id/scale", get(scale_recipe))
}

#[instrument(skip(svc, payload))]
pub async fn create_recipe(
    State(svc): State<RecipeService>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RecipeRequest>,
) -> AppResult<(StatusCode, Json<CreatedRecipeResponse>)> {
    let id = svc.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedRecipeResponse { id })))
}

#[instrument(skip(svc))]
pub async fn list_recipes(
    State(svc): State<RecipeService>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<RecipeSummary>>> {
    Ok(Json(svc.list_mine(user_id).await?))
}

#[instrument(skip(svc))]
pub async fn get_recipe(
    State(svc): State<RecipeService>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RecipeDetailResponse>> {
    Ok(Json(svc.get(id, user_id).await?))
}

#[instrument(skip(svc, payload))]
pub async fn update_recipe(
    State(svc): State<RecipeService>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeRequest>,
) -> AppResult<StatusCode> {
    svc.update(id, user_id, payload).await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(svc))]
pub async fn delete_recipe(
    State(svc): State<RecipeService>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    svc.delete(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /recipes/:id/scale?servings=N
#[instrument(skip(svc))]
pub async fn scale_recipe(
    State(svc): State<RecipeService>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Query(q): Query<ScaleQuery>,
) -> AppResult<Json<ScaledRecipeResponse>> {
    let servings = q
        .servings
        .ok_or_else(|| AppError::validation("servings query parameter is required"))?;
    Ok(Json(svc.scale(id, user_id, servings).await?))
}
