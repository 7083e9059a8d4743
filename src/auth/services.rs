use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo_types::User,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::validation("invalid email"));
    }
    Ok(email)
}

/// Trimmed name and lowercased email of a registration, or why it is refused.
fn validate_registration(req: &RegisterRequest) -> AppResult<(String, String)> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    let email = normalize_email(&req.email)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok((name.to_string(), email))
}

fn token_pair(keys: &JwtKeys, user: User) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        access_token: keys.sign_access(user.id)?,
        refresh_token: keys.sign_refresh(user.id)?,
        user: user.into(),
    })
}

pub async fn register(st: &AppState, keys: &JwtKeys, req: RegisterRequest) -> AppResult<AuthResponse> {
    let (name, email) = validate_registration(&req)?;
    if User::find_by_email(&st.db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("email already registered".into()));
    }

    let hash = hash_password(&req.password)?;
    let user = User::create(&st.db, &name, &email, &hash)
        .await?
        .ok_or_else(|| AppError::Conflict("email already registered".into()))?;
    info!(user_id = %user.id, "user registered");
    token_pair(keys, user)
}

pub async fn login(st: &AppState, keys: &JwtKeys, req: LoginRequest) -> AppResult<AuthResponse> {
    let email = normalize_email(&req.email)?;
    let bad_credentials = || AppError::Unauthenticated("invalid credentials".into());

    let Some(user) = User::find_by_email(&st.db, &email).await? else {
        warn!(%email, "login for unknown email");
        return Err(bad_credentials());
    };
    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(bad_credentials());
    }
    info!(user_id = %user.id, "user logged in");
    token_pair(keys, user)
}

pub async fn refresh(st: &AppState, keys: &JwtKeys, req: RefreshRequest) -> AppResult<AuthResponse> {
    let claims = keys
        .verify_refresh(&req.refresh_token)
        .map_err(|e| AppError::Unauthenticated(e.to_string()))?;
    let user = User::find_by_id(&st.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("user not found".into()))?;
    token_pair(keys, user)
}

pub async fn me(st: &AppState, user_id: Uuid) -> AppResult<PublicUser> {
    let user = User::find_by_id(&st.db, user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(user.into())
}
