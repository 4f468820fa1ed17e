//! Integration tests for the `PostgreSQL` record store.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `DATABASE_URL` pointing at it
//!
//! Each test works in its own schema and drops it afterwards.
//!
//! Run with: cargo test -p reviews-integration-tests --test postgres_store -- --ignored

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reviews_core::{RecordId, RestaurantEntry, RestaurantKey, SearchFilter, Username};
use reviews_web::db::{PgRecordStore, RecordStore, StoreError, create_pool};
use reviews_web::services::{AuthError, AuthService, DeleteOutcome, RestaurantService};
use secrecy::SecretString;

/// A store over a throwaway schema.
struct TestSchema {
    name: String,
    store: PgRecordStore,
}

impl TestSchema {
    async fn create() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = create_pool(&SecretString::from(url)).await.unwrap();
        let name = format!(
            "reviews_test_{}",
            RecordId::generate().to_string().replace('-', "_")
        );

        let store = PgRecordStore::new(pool, &name);
        store.ensure_collections().await.unwrap();
        Self { name, store }
    }

    async fn cleanup(self) {
        sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", self.name))
            .execute(self.store.pool())
            .await
            .unwrap();
    }
}

fn entry(user: &str, name: &str, cuisine: &str, review: &str) -> RestaurantEntry {
    RestaurantEntry {
        username: user.to_string(),
        restaurant_name: name.to_string(),
        cuisine: cuisine.to_string(),
        location: "Harbor Rd".to_string(),
        review: review.to_string(),
    }
}

fn key(user: &str, name: &str, cuisine: &str) -> RestaurantKey {
    RestaurantKey {
        username: user.to_string(),
        restaurant_name: name.to_string(),
        cuisine: cuisine.to_string(),
    }
}

async fn names(store: &PgRecordStore, filter: &SearchFilter) -> Vec<String> {
    store
        .search_restaurants(filter)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.restaurant_name)
        .collect()
}

// ============================================================================
// Collections
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_ensure_collections_is_idempotent() {
    let schema = TestSchema::create().await;

    schema.store.ensure_collections().await.unwrap();
    schema.store.ping().await.unwrap();
    assert!(schema.store.list_restaurants().await.unwrap().is_empty());

    schema.cleanup().await;
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_duplicate_username_is_conflict() {
    let schema = TestSchema::create().await;
    let alice = Username::parse("alice").unwrap();

    let user = schema.store.insert_user(&alice, "hash").await.unwrap();
    let err = schema.store.insert_user(&alice, "other").await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");

    let (found, hash) = schema
        .store
        .find_user_credentials(&alice)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, user);
    assert_eq!(hash, "hash");
    assert_eq!(schema.store.find_user(user.id).await.unwrap(), Some(user));

    schema.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_register_then_login() {
    let schema = TestSchema::create().await;
    let auth = AuthService::new(&schema.store);

    let user = auth.register("alice", "correct-horse").await.unwrap();
    assert!(matches!(
        auth.register("alice", "another").await,
        Err(AuthError::UserAlreadyExists)
    ));

    assert_eq!(auth.login("alice", "correct-horse").await.unwrap(), user);
    assert!(matches!(
        auth.login("alice", "wrong").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        auth.login("ALICE", "correct-horse").await,
        Err(AuthError::InvalidCredentials)
    ));

    schema.cleanup().await;
}

// ============================================================================
// Restaurants
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_list_uses_byte_order() {
    let schema = TestSchema::create().await;
    for name in ["apple", "Banana", "Zaatar"] {
        schema
            .store
            .insert_restaurant(&entry("alice", name, "Any", "ok"))
            .await
            .unwrap();
    }

    let listed: Vec<String> = schema
        .store
        .list_restaurants()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.restaurant_name)
        .collect();
    assert_eq!(listed, ["Banana", "Zaatar", "apple"]);

    schema.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_search_ignores_case_and_combines_terms() {
    let schema = TestSchema::create().await;
    for (user, name, cuisine) in [
        ("alice", "Taco Town", "Mexican"),
        ("bob", "TACO Palace", "Mexican"),
        ("bob", "Sushi Zen", "Japanese"),
    ] {
        schema
            .store
            .insert_restaurant(&entry(user, name, cuisine, "ok"))
            .await
            .unwrap();
    }

    let by_name = SearchFilter::new(Some("taco"), None, None);
    assert_eq!(
        names(&schema.store, &by_name).await,
        ["Taco Town", "TACO Palace"]
    );

    let combined = SearchFilter::new(Some("taco"), Some("mex"), Some("BOB"));
    assert_eq!(names(&schema.store, &combined).await, ["TACO Palace"]);

    schema.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_search_terms_are_literal() {
    let schema = TestSchema::create().await;
    for name in ["100% Tacos", "100 Tacos", "a_b", "axb", "back\\slash", "backslash"] {
        schema
            .store
            .insert_restaurant(&entry("alice", name, "Any", "ok"))
            .await
            .unwrap();
    }

    let percent = SearchFilter::new(Some("%"), None, None);
    assert_eq!(names(&schema.store, &percent).await, ["100% Tacos"]);

    let underscore = SearchFilter::new(Some("_"), None, None);
    assert_eq!(names(&schema.store, &underscore).await, ["a_b"]);

    let backslash = SearchFilter::new(Some("k\\s"), None, None);
    assert_eq!(names(&schema.store, &backslash).await, ["back\\slash"]);

    schema.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_search_without_terms_is_empty() {
    let schema = TestSchema::create().await;
    schema
        .store
        .insert_restaurant(&entry("alice", "Taco Town", "Mexican", "ok"))
        .await
        .unwrap();

    let service = RestaurantService::new(&schema.store);
    let filter = SearchFilter::new(Some("  "), None, Some(""));
    assert!(service.search(&filter).await.unwrap().is_empty());

    schema.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_update_restaurant() {
    let schema = TestSchema::create().await;
    let record = schema
        .store
        .insert_restaurant(&entry("alice", "Taco Town", "Mexican", "ok"))
        .await
        .unwrap();

    let updated = entry("alice", "Taco City", "Tex-Mex", "Better now");
    assert!(schema
        .store
        .update_restaurant(record.id, &updated)
        .await
        .unwrap());

    let found = schema
        .store
        .find_restaurant(record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, record.id);
    assert_eq!(found.entry(), updated);

    assert!(!schema
        .store
        .update_restaurant(RecordId::generate(), &updated)
        .await
        .unwrap());

    schema.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_delete_removes_first_match_only() {
    let schema = TestSchema::create().await;
    let first = schema
        .store
        .insert_restaurant(&entry("alice", "Taco Town", "Mexican", "first"))
        .await
        .unwrap();
    let second = schema
        .store
        .insert_restaurant(&entry("alice", "Taco Town", "Mexican", "second"))
        .await
        .unwrap();

    let deleted = schema
        .store
        .delete_restaurant(&key("alice", "Taco Town", "Mexican"))
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert!(schema.store.find_restaurant(first.id).await.unwrap().is_none());

    let remaining = schema.store.list_restaurants().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
    assert_eq!(remaining[0].review, "second");

    schema.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_delete_requires_exact_key() {
    let schema = TestSchema::create().await;
    schema
        .store
        .insert_restaurant(&entry("alice", "Taco Town", "Mexican", "ok"))
        .await
        .unwrap();

    let service = RestaurantService::new(&schema.store);
    for other in [
        key("bob", "Taco Town", "Mexican"),
        key("alice", "taco town", "Mexican"),
        key("alice", "Taco Town", "Tex-Mex"),
    ] {
        assert_eq!(service.delete(&other).await.unwrap(), DeleteOutcome::NotFound);
    }
    assert_eq!(
        service
            .delete(&key("alice", "Taco Town", "Mexican"))
            .await
            .unwrap(),
        DeleteOutcome::Deleted
    );
    assert!(schema.store.list_restaurants().await.unwrap().is_empty());

    schema.cleanup().await;
}
