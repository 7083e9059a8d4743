use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::{claims::TokenKind, jwt::JwtKeys};
use crate::error::AppError;

/// Id of the caller, taken from a valid `Bearer` access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("missing Authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthenticated("invalid Authorization header".into()))?;

        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            AppError::Unauthenticated("invalid or expired token".into())
        })?;

        if claims.kind != TokenKind::Access {
            return Err(AppError::Unauthenticated("access token required".into()));
        }
        Ok(AuthUser(claims.sub))
    }
}
