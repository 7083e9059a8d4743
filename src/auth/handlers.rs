use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    services,
};
use crate::{error::AppResult, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, keys, payload))]
pub async fn register(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let resp = services::register(&state, &keys, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[instrument(skip(state, keys, payload))]
pub async fn login(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(services::login(&state, &keys, payload).await?))
}

#[instrument(skip(state, keys, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(services::refresh(&state, &keys, payload).await?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    Ok(Json(services::me(&state, user_id).await?))
}
