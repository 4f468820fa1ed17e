//! Collection setup commands.
//!
//! # Usage
//!
//! ```bash
//! reviews-cli collections init
//! ```
//!
//! Safe to run repeatedly: every statement is `IF NOT EXISTS`.

use reviews_web::db::StoreError;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Errors that can occur while preparing collections.
#[derive(Debug, Error)]
pub enum CollectionsError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Creating a collection or index failed.
    #[error("Failed to create collections: {0}")]
    Store(#[from] StoreError),

    /// Creating the session table failed.
    #[error("Failed to create session table: {0}")]
    Sessions(#[from] sqlx::Error),
}

/// Create the schema, `users` and `restaurants` collections, the unique
/// username index, and the session table.
pub async fn init() -> Result<(), CollectionsError> {
    let store = connect().await?;

    tracing::info!("Creating collections...");
    store.ensure_collections().await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(store.pool().clone()).migrate().await?;

    tracing::info!("Collections ready!");
    Ok(())
}
