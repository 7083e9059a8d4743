use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Error kinds every service returns; the HTTP mapping lives only here.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid date range")]
    InvalidDateRange,

    #[error("{0}")]
    Unauthenticated(String),

    #[error("not authorized")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidDateRange => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Internal(e) = &self {
            error!(error = %e, "request failed");
            // Store details stay in the logs.
            return (status, "internal server error".to_string()).into_response();
        }
        (status, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Every owned resource goes through this before it is read or mutated.
pub fn ensure_owner(owner_id: Uuid, user_id: Uuid) -> AppResult<()> {
    if owner_id != user_id {
        warn!(%owner_id, %user_id, "ownership check failed");
        return Err(AppError::Forbidden);
    }
    Ok(())
}
