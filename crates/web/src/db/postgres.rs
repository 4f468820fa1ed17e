//! `PostgreSQL` document store.
//!
//! Each collection is a table of JSONB documents:
//!
//! ```sql
//! CREATE TABLE <schema>.<collection> (
//!     id UUID PRIMARY KEY,
//!     seq BIGINT GENERATED ALWAYS AS IDENTITY,
//!     doc JSONB NOT NULL
//! );
//! ```
//!
//! `seq` records insertion order. Queries use runtime-checked `sqlx::query`
//! because table names depend on the configured schema.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use reviews_core::{
    RecordId, Restaurant, RestaurantEntry, RestaurantKey, SearchFilter, UserId, Username,
};

use super::{RecordStore, StoreError};
use crate::models::User;

/// Stored shape of a `users` document.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    username: String,
    password: String,
}

type DocumentRow<T> = (Uuid, Json<T>);

/// Record store backed by `PostgreSQL` JSONB tables.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
    schema: String,
    users: String,
    restaurants: String,
}

impl PgRecordStore {
    /// Create a store over the collections in schema `database_name`.
    ///
    /// `database_name` must already be validated as a plain SQL identifier
    /// (see [`crate::config::validate_database_name`]).
    #[must_use]
    pub fn new(pool: PgPool, database_name: &str) -> Self {
        Self {
            pool,
            schema: format!("\"{database_name}\""),
            users: format!("\"{database_name}\".users"),
            restaurants: format!("\"{database_name}\".restaurants"),
        }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the schema, both collections, and the username index if missing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if any statement fails.
    pub async fn ensure_collections(&self) -> Result<(), StoreError> {
        let statements = [
            format!("CREATE SCHEMA IF NOT EXISTS {}", self.schema),
            collection_ddl(&self.users),
            collection_ddl(&self.restaurants),
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON {} ((doc->>'username'))",
                self.users
            ),
        ];

        for statement in &statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!(schema = %self.schema, "Collections ready");
        Ok(())
    }

    fn user_from_document(id: Uuid, doc: UserDocument) -> Result<(User, String), StoreError> {
        let username = Username::parse(&doc.username).map_err(|e| {
            StoreError::DataCorruption(format!("invalid username in users/{id}: {e}"))
        })?;

        Ok((
            User {
                id: UserId::new(id),
                username,
            },
            doc.password,
        ))
    }
}

fn collection_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
            id UUID PRIMARY KEY, \
            seq BIGINT GENERATED ALWAYS AS IDENTITY, \
            doc JSONB NOT NULL\
        )"
    )
}

/// Build an `ILIKE` pattern matching `term` anywhere, with wildcards escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn restaurant_from_row((id, Json(entry)): DocumentRow<RestaurantEntry>) -> Restaurant {
    Restaurant::from_entry(RecordId::new(id), entry)
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", self.users);
        let row: Option<DocumentRow<UserDocument>> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(id, Json(doc))| Self::user_from_document(id, doc).map(|(user, _)| user))
            .transpose()
    }

    async fn find_user_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, StoreError> {
        let sql = format!(
            "SELECT id, doc FROM {} WHERE doc->>'username' = $1",
            self.users
        );
        let row: Option<DocumentRow<UserDocument>> = sqlx::query_as(&sql)
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(id, Json(doc))| Self::user_from_document(id, doc))
            .transpose()
    }

    async fn insert_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let id = UserId::generate();
        let doc = UserDocument {
            username: username.as_str().to_owned(),
            password: password_hash.to_owned(),
        };

        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", self.users);
        sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(Json(doc))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::Conflict(format!("username '{username}' already exists"))
                }
                other => StoreError::Database(other),
            })?;

        Ok(User {
            id,
            username: username.clone(),
        })
    }

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        let sql = format!(
            r#"SELECT id, doc FROM {} ORDER BY doc->>'restaurantName' COLLATE "C", seq"#,
            self.restaurants
        );
        let rows: Vec<DocumentRow<RestaurantEntry>> =
            sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(restaurant_from_row).collect())
    }

    async fn search_restaurants(
        &self,
        filter: &SearchFilter,
    ) -> Result<Vec<Restaurant>, StoreError> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT id, doc FROM {} WHERE TRUE",
            self.restaurants
        ));

        let terms = [
            ("restaurantName", filter.name()),
            ("cuisine", filter.cuisine()),
            ("username", filter.user()),
        ];
        for (field, term) in terms {
            if let Some(term) = term {
                query
                    .push(format!(" AND doc->>'{field}' ILIKE "))
                    .push_bind(contains_pattern(term));
            }
        }
        query.push(" ORDER BY seq");

        let rows: Vec<DocumentRow<RestaurantEntry>> =
            query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(restaurant_from_row).collect())
    }

    async fn find_restaurant(&self, id: RecordId) -> Result<Option<Restaurant>, StoreError> {
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", self.restaurants);
        let row: Option<DocumentRow<RestaurantEntry>> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(restaurant_from_row))
    }

    async fn insert_restaurant(&self, entry: &RestaurantEntry) -> Result<Restaurant, StoreError> {
        let id = RecordId::generate();
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", self.restaurants);
        sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(Json(entry.clone()))
            .execute(&self.pool)
            .await?;

        Ok(Restaurant::from_entry(id, entry.clone()))
    }

    async fn update_restaurant(
        &self,
        id: RecordId,
        entry: &RestaurantEntry,
    ) -> Result<bool, StoreError> {
        let sql = format!("UPDATE {} SET doc = $2 WHERE id = $1", self.restaurants);
        let result = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(Json(entry.clone()))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_restaurant(&self, key: &RestaurantKey) -> Result<u64, StoreError> {
        let sql = format!(
            "DELETE FROM {table} WHERE id = (\
                SELECT id FROM {table} \
                WHERE doc->>'username' = $1 \
                  AND doc->>'restaurantName' = $2 \
                  AND doc->>'cuisine' = $3 \
                ORDER BY seq LIMIT 1\
            )",
            table = self.restaurants
        );
        let result = sqlx::query(&sql)
            .bind(&key.username)
            .bind(&key.restaurant_name)
            .bind(&key.cuisine)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_term() {
        assert_eq!(contains_pattern("Taco"), "%Taco%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("100%_real\\"), "%100\\%\\_real\\\\%");
    }

    #[test]
    fn test_collection_ddl_names_table() {
        let ddl = collection_ddl("\"reviews\".users");
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS \"reviews\".users ("));
        assert!(ddl.contains("doc JSONB NOT NULL"));
    }
}
