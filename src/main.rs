mod app;
mod auth;
mod config;
mod dates;
mod error;
mod ingredients;
mod instructions;
mod meal_plans;
mod recipes;
mod shopping_lists;
mod state;
#[cfg(test)]
mod testing;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("recipebook=debug,axum=info,tower_http=info"));
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;
    tracing::info!(
        loading = ?state.config.ingredient_loading,
        max_connections = state.config.db_max_connections,
        "database pool ready"
    );

    if let Err(e) = sqlx::migrate!("./migrations").run(&state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let config = state.config.clone();
    app::serve(app::build_app(state), &config).await
}
