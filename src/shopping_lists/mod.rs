use crate::state::AppState;
use axum::Router;

pub mod aggregate;
mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::shopping_list_routes())
}
