use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        GenerateShoppingListRequest, ShoppingListResponse, ShoppingListSummaryResponse,
        ToggledItemResponse,
    },
    services::ShoppingListService,
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn shopping_list_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shopping-lists",
            post(generate_shopping_list).get(list_shopping_lists),
        )
        .route(
            "/shopping-lists/:id",
            get(get_shopping_list).delete(delete_shopping_list),
        )
        .route("/shopping-lists/items/:id/toggle", patch(toggle_item))
}

#[instrument(skip(svc))]
pub async fn generate_shopping_list(
    State(svc): State<ShoppingListService>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<GenerateShoppingListRequest>,
) -> AppResult<(StatusCode, Json<ShoppingListResponse>)> {
    let list = svc.generate(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

#[instrument(skip(svc))]
pub async fn list_shopping_lists(
    State(svc): State<ShoppingListService>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<ShoppingListSummaryResponse>>> {
    Ok(Json(svc.list_for_user(user_id).await?))
}

#[instrument(skip(svc))]
pub async fn get_shopping_list(
    State(svc): State<ShoppingListService>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ShoppingListResponse>> {
    Ok(Json(svc.get_by_id(id, user_id).await?))
}

#[instrument(skip(svc))]
pub async fn delete_shopping_list(
    State(svc): State<ShoppingListService>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    svc.delete(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /shopping-lists/items/:id/toggle
#[instrument(skip(svc))]
pub async fn toggle_item(
    State(svc): State<ShoppingListService>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ToggledItemResponse>> {
    Ok(Json(svc.toggle_checked(id, user_id).await?))
}
