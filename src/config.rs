use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// How the shopping-list generator reaches the ingredient lines of planned recipes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IngredientLoading {
    /// One joined query over plans, recipes and ingredient lines.
    #[default]
    Eager,
    /// Plans first, then one ingredient query per plan.
    PerPlan,
}

impl FromStr for IngredientLoading {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(Self::Eager),
            "per-plan" | "per_plan" => Ok(Self::PerPlan),
            other => anyhow::bail!("unknown ingredient loading strategy: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub ingredient_loading: IngredientLoading,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| database_url_from_parts());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "recipebook"),
            audience: env_or("JWT_AUDIENCE", "recipebook-users"),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60 * 24),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let ingredient_loading = match std::env::var("SHOPPING_LIST_LOADING") {
            Ok(v) => v.parse()?,
            Err(_) => IngredientLoading::default(),
        };
        Ok(Self {
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 10),
            host: env_or("APP_HOST", "0.0.0.0"),
            port: env_parse("APP_PORT", 8080),
            jwt,
            ingredient_loading,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn database_url_from_parts() -> String {
    format!(
        "postgres://{}:{}@{}:{}/{}",
        env_or("DB_USER", "postgres"),
        env_or("DB_PASSWORD", "password"),
        env_or("DB_HOST", "localhost"),
        env_or("DB_PORT", "5432"),
        env_or("DB_NAME", "recipe_db"),
    )
}
