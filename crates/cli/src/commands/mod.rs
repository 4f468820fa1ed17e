//! CLI command implementations.

pub mod collections;
pub mod user;

use reviews_web::config::{ConfigError, validate_database_name};
use reviews_web::db::{self, PgRecordStore};
use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by the database-backed commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable has an unusable value.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect to the database named by the environment.
///
/// Reads `REVIEWS_DATABASE_URL` (falling back to `DATABASE_URL`) and
/// `REVIEWS_DATABASE_NAME` (default `reviews`).
pub async fn connect() -> Result<PgRecordStore, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("REVIEWS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("REVIEWS_DATABASE_URL"))?;
    let database_name =
        std::env::var("REVIEWS_DATABASE_NAME").unwrap_or_else(|_| "reviews".to_string());
    validate_database_name(&database_name, "REVIEWS_DATABASE_NAME")?;

    tracing::info!(database = %database_name, "Connecting to database...");
    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    Ok(PgRecordStore::new(pool, &database_name))
}
