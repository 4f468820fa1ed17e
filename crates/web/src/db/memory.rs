//! In-memory record store.
//!
//! # Limitations
//!
//! This store won't persist data between server restarts.
//! It is primarily intended for testing and local development.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use reviews_core::{
    RecordId, Restaurant, RestaurantEntry, RestaurantKey, SearchFilter, UserId, Username,
};

use super::{RecordStore, StoreError};
use crate::models::User;

#[derive(Debug, Default)]
struct Collections {
    users: Vec<(User, String)>,
    restaurants: Vec<Restaurant>,
}

/// Record store keeping both collections in process memory.
///
/// Clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryRecordStore {
    /// Creates a new (empty) in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_user_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard
            .users
            .iter()
            .find(|(user, _)| &user.username == username)
            .cloned())
    }

    async fn insert_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut guard = self.inner.write().await;
        if guard.users.iter().any(|(user, _)| &user.username == username) {
            return Err(StoreError::Conflict(format!(
                "username '{username}' already exists"
            )));
        }

        let user = User {
            id: UserId::generate(),
            username: username.clone(),
        };
        guard.users.push((user.clone(), password_hash.to_owned()));
        Ok(user)
    }

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        let guard = self.inner.read().await;
        let mut restaurants = guard.restaurants.clone();
        // Stable sort keeps insertion order among equal names
        restaurants.sort_by(|a, b| a.restaurant_name.cmp(&b.restaurant_name));
        Ok(restaurants)
    }

    async fn search_restaurants(
        &self,
        filter: &SearchFilter,
    ) -> Result<Vec<Restaurant>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard
            .restaurants
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn find_restaurant(&self, id: RecordId) -> Result<Option<Restaurant>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard.restaurants.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_restaurant(&self, entry: &RestaurantEntry) -> Result<Restaurant, StoreError> {
        let restaurant = Restaurant::from_entry(RecordId::generate(), entry.clone());
        self.inner.write().await.restaurants.push(restaurant.clone());
        Ok(restaurant)
    }

    async fn update_restaurant(
        &self,
        id: RecordId,
        entry: &RestaurantEntry,
    ) -> Result<bool, StoreError> {
        let mut guard = self.inner.write().await;
        match guard.restaurants.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                *slot = Restaurant::from_entry(id, entry.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_restaurant(&self, key: &RestaurantKey) -> Result<u64, StoreError> {
        let mut guard = self.inner.write().await;
        match guard.restaurants.iter().position(|r| r.matches_key(key)) {
            Some(index) => {
                guard.restaurants.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(user: &str, name: &str, cuisine: &str) -> RestaurantEntry {
        RestaurantEntry {
            username: user.to_string(),
            restaurant_name: name.to_string(),
            cuisine: cuisine.to_string(),
            location: "Downtown".to_string(),
            review: "Solid".to_string(),
        }
    }

    fn key(user: &str, name: &str, cuisine: &str) -> RestaurantKey {
        RestaurantKey {
            username: user.to_string(),
            restaurant_name: name.to_string(),
            cuisine: cuisine.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_user_rejects_duplicate() {
        let store = MemoryRecordStore::new();
        let alice = Username::parse("alice").unwrap();

        store.insert_user(&alice, "hash").await.unwrap();
        let err = store.insert_user(&alice, "other").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_user_by_id_and_username() {
        let store = MemoryRecordStore::new();
        let bob = Username::parse("bob").unwrap();
        let user = store.insert_user(&bob, "hash").await.unwrap();

        assert_eq!(store.find_user(user.id).await.unwrap(), Some(user.clone()));
        let (found, hash) = store.find_user_credentials(&bob).await.unwrap().unwrap();
        assert_eq!(found, user);
        assert_eq!(hash, "hash");
        assert!(store.find_user(UserId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let store = MemoryRecordStore::new();
        for name in ["Zaatar", "Burger Hut", "Marrow"] {
            store
                .insert_restaurant(&entry("alice", name, "Any"))
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list_restaurants()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.restaurant_name)
            .collect();
        assert_eq!(names, ["Burger Hut", "Marrow", "Zaatar"]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_first_match() {
        let store = MemoryRecordStore::new();
        let first = store
            .insert_restaurant(&entry("alice", "Taco Town", "Mexican"))
            .await
            .unwrap();
        let second = store
            .insert_restaurant(&entry("alice", "Taco Town", "Mexican"))
            .await
            .unwrap();

        let deleted = store
            .delete_restaurant(&key("alice", "Taco Town", "Mexican"))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(store.find_restaurant(first.id).await.unwrap().is_none());
        assert!(store.find_restaurant(second.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_without_match() {
        let store = MemoryRecordStore::new();
        store
            .insert_restaurant(&entry("alice", "Taco Town", "Mexican"))
            .await
            .unwrap();

        let deleted = store
            .delete_restaurant(&key("bob", "Taco Town", "Mexican"))
            .await
            .unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(store.list_restaurants().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_document() {
        let store = MemoryRecordStore::new();
        let record = store
            .insert_restaurant(&entry("alice", "Taco Town", "Mexican"))
            .await
            .unwrap();

        let updated = entry("alice", "Taco City", "Tex-Mex");
        assert!(store.update_restaurant(record.id, &updated).await.unwrap());
        let found = store.find_restaurant(record.id).await.unwrap().unwrap();
        assert_eq!(found.restaurant_name, "Taco City");

        assert!(
            !store
                .update_restaurant(RecordId::generate(), &updated)
                .await
                .unwrap()
        );
    }
}
