use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateMealPlanRequest, MealPlanQuery, MealPlanResponse, UpdateMealPlanRequest},
    services::MealPlanService,
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans", post(create_meal_plan).get(list_meal_plans))
        .route(
            "/meal-plans/:id",
            put(update_meal_plan).delete(delete_meal_plan),
        )
}

#[instrument(skip(svc, payload))]
pub async fn create_meal_plan(
    State(svc): State<MealPlanService>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMealPlanRequest>,
) -> AppResult<(StatusCode, Json<MealPlanResponse>)> {
    let plan = svc.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET /meal-plans?date=YYYY-MM-DD or ?start_date=..&end_date=..
#[instrument(skip(svc))]
pub async fn list_meal_plans(
    State(svc): State<MealPlanService>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MealPlanQuery>,
) -> AppResult<Json<Vec<MealPlanResponse>>> {
    Ok(Json(svc.list(user_id, q).await?))
}

#[instrument(skip(svc, payload))]
pub async fn update_meal_plan(
    State(svc): State<MealPlanService>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMealPlanRequest>,
) -> AppResult<Json<MealPlanResponse>> {
    Ok(Json(svc.update(id, user_id, payload).await?))
}

#[instrument(skip(svc))]
pub async fn delete_meal_plan(
    State(svc): State<MealPlanService>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    svc.delete(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
