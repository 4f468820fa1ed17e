//! Record store: document collections behind a single trait.
//!
//! # Collections
//!
//! - `users` - `{"username", "password"}` documents; `username` is unique
//! - `restaurants` - `{"username", "restaurantName", "cuisine", "location", "review"}`
//!
//! Every document gets a store-generated UUID identifier.
//!
//! # Implementations
//!
//! - [`PgRecordStore`] - `PostgreSQL` tables of JSONB documents, one schema
//!   per configured database name
//! - [`MemoryRecordStore`] - in-process collections for tests and local development

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use reviews_core::{
    RecordId, Restaurant, RestaurantEntry, RestaurantKey, SearchFilter, UserId, Username,
};

use crate::models::User;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

/// Errors raised by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document does not have the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Document store holding the `users` and `restaurants` collections.
///
/// Handlers receive the store through [`crate::state::AppState`]; nothing
/// holds a process-wide handle.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Check that the backing database is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Get a user by ID.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Get a user together with their password hash.
    async fn find_user_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, StoreError>;

    /// Insert a new user.
    ///
    /// Returns `StoreError::Conflict` if the username is taken.
    async fn insert_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, StoreError>;

    /// All restaurant records sorted by restaurant name.
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError>;

    /// Records matching every term of `filter`, in insertion order.
    ///
    /// An empty filter matches every record.
    async fn search_restaurants(
        &self,
        filter: &SearchFilter,
    ) -> Result<Vec<Restaurant>, StoreError>;

    /// Get a restaurant record by ID.
    async fn find_restaurant(&self, id: RecordId) -> Result<Option<Restaurant>, StoreError>;

    /// Insert a restaurant record and return it with its new identifier.
    async fn insert_restaurant(&self, entry: &RestaurantEntry) -> Result<Restaurant, StoreError>;

    /// Replace the body of a restaurant record.
    ///
    /// Returns `false` if no record has that ID.
    async fn update_restaurant(
        &self,
        id: RecordId,
        entry: &RestaurantEntry,
    ) -> Result<bool, StoreError>;

    /// Delete the first record (in insertion order) matching `key` exactly.
    ///
    /// Returns the number of deleted records: 0 or 1.
    async fn delete_restaurant(&self, key: &RestaurantKey) -> Result<u64, StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
