//! Restaurant record service.

use reviews_core::{RecordId, Restaurant, RestaurantEntry, RestaurantKey, SearchFilter};

use crate::db::{RecordStore, StoreError};

/// Result of a delete-by-key request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// One record matched and was removed.
    Deleted,
    /// No record matched the key.
    NotFound,
}

/// Listing, search, and create/edit/delete over the `restaurants` collection.
pub struct RestaurantService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> RestaurantService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// All records, sorted by restaurant name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store query fails.
    pub async fn list_all(&self) -> Result<Vec<Restaurant>, StoreError> {
        self.store.list_restaurants().await
    }

    /// Records matching every supplied term of `filter`.
    ///
    /// A filter with no terms returns no records rather than the whole
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store query fails.
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<Restaurant>, StoreError> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        self.store.search_restaurants(filter).await
    }

    /// Insert a record. No validation and no duplicate detection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the insert fails.
    pub async fn add(&self, entry: &RestaurantEntry) -> Result<Restaurant, StoreError> {
        let restaurant = self.store.insert_restaurant(entry).await?;
        tracing::info!(
            id = %restaurant.id,
            username = %restaurant.username,
            restaurant = %restaurant.restaurant_name,
            "Restaurant added"
        );
        Ok(restaurant)
    }

    /// Get one record for editing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the lookup fails.
    pub async fn get(&self, id: RecordId) -> Result<Option<Restaurant>, StoreError> {
        self.store.find_restaurant(id).await
    }

    /// Persist edited fields. Returns `false` if the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the update fails.
    pub async fn update(&self, id: RecordId, entry: &RestaurantEntry) -> Result<bool, StoreError> {
        let updated = self.store.update_restaurant(id, entry).await?;
        if updated {
            tracing::info!(%id, restaurant = %entry.restaurant_name, "Restaurant updated");
        }
        Ok(updated)
    }

    /// Delete the first record matching `key` exactly.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    pub async fn delete(&self, key: &RestaurantKey) -> Result<DeleteOutcome, StoreError> {
        let deleted = self.store.delete_restaurant(key).await?;
        if deleted == 0 {
            tracing::warn!(
                username = %key.username,
                restaurant = %key.restaurant_name,
                cuisine = %key.cuisine,
                "No restaurant matched delete key"
            );
            return Ok(DeleteOutcome::NotFound);
        }
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryRecordStore;

    fn entry(user: &str, name: &str, cuisine: &str) -> RestaurantEntry {
        RestaurantEntry {
            username: user.to_string(),
            restaurant_name: name.to_string(),
            cuisine: cuisine.to_string(),
            location: "Harbor Rd".to_string(),
            review: "Would return".to_string(),
        }
    }

    async fn seeded() -> MemoryRecordStore {
        let store = MemoryRecordStore::new();
        let service = RestaurantService::new(&store);
        for (user, name, cuisine) in [
            ("alice", "Taco Town", "Mexican"),
            ("bob", "Sushi Zen", "Japanese"),
            ("alice", "El Taco Loco", "Mexican"),
            ("carol", "Pasta Place", "Italian"),
        ] {
            service.add(&entry(user, name, cuisine)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_search_without_terms_is_empty() {
        let store = seeded().await;
        let service = RestaurantService::new(&store);

        let results = service.search(&SearchFilter::default()).await.unwrap();
        assert!(results.is_empty());

        let blank = SearchFilter::new(Some(""), Some(" "), None);
        assert!(service.search(&blank).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_by_name_ignores_case() {
        let store = seeded().await;
        let service = RestaurantService::new(&store);

        let results = service
            .search(&SearchFilter::new(Some("Taco"), None, None))
            .await
            .unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.restaurant_name.as_str()).collect();
        assert_eq!(names, ["Taco Town", "El Taco Loco"]);
    }

    #[tokio::test]
    async fn test_search_combines_terms() {
        let store = seeded().await;
        let service = RestaurantService::new(&store);

        let results = service
            .search(&SearchFilter::new(None, Some("mex"), Some("ALICE")))
            .await
            .unwrap();
        assert_eq!(results.len(), 2);

        let results = service
            .search(&SearchFilter::new(Some("sushi"), None, Some("alice")))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let store = seeded().await;
        let service = RestaurantService::new(&store);

        service
            .add(&entry("dave", "Arepa House", "Venezuelan"))
            .await
            .unwrap();
        let all = service.list_all().await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].restaurant_name, "Arepa House");
    }

    #[tokio::test]
    async fn test_delete_outcomes() {
        let store = seeded().await;
        let service = RestaurantService::new(&store);

        let key = RestaurantKey {
            username: "bob".to_string(),
            restaurant_name: "Sushi Zen".to_string(),
            cuisine: "Japanese".to_string(),
        };
        assert_eq!(service.delete(&key).await.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(service.delete(&key).await.unwrap(), DeleteOutcome::NotFound);
        assert_eq!(service.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_persists() {
        let store = seeded().await;
        let service = RestaurantService::new(&store);
        let record = service.list_all().await.unwrap().remove(0);

        let mut edited = record.entry();
        edited.review = "Went downhill".to_string();
        assert!(service.update(record.id, &edited).await.unwrap());
        assert_eq!(
            service.get(record.id).await.unwrap().unwrap().review,
            "Went downhill"
        );
    }
}
