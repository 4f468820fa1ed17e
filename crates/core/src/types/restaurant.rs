//! Restaurant review records.
//!
//! A restaurant record is stored as a document with the field names below
//! (`restaurantName` rather than `restaurant_name`) so existing collections
//! stay readable.

use serde::{Deserialize, Serialize};

use super::id::RecordId;

/// The body of a restaurant record, as stored in the `restaurants` collection.
///
/// Field contents are free text and are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantEntry {
    /// Username of the reviewer who owns the record.
    pub username: String,
    /// Name of the restaurant.
    pub restaurant_name: String,
    /// Cuisine served.
    pub cuisine: String,
    /// Where the restaurant is.
    pub location: String,
    /// Free-text review.
    pub review: String,
}

/// A stored restaurant record: an entry plus its store-generated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RecordId,
    pub username: String,
    pub restaurant_name: String,
    pub cuisine: String,
    pub location: String,
    pub review: String,
}

// Restaurant and RestaurantEntry carry the same five document fields; keep
// `from_entry` and `entry` in sync when adding one.

impl Restaurant {
    /// Attach an identifier to an entry.
    #[must_use]
    pub fn from_entry(id: RecordId, entry: RestaurantEntry) -> Self {
        Self {
            id,
            username: entry.username,
            restaurant_name: entry.restaurant_name,
            cuisine: entry.cuisine,
            location: entry.location,
            review: entry.review,
        }
    }

    /// The record body without its identifier.
    #[must_use]
    pub fn entry(&self) -> RestaurantEntry {
        RestaurantEntry {
            username: self.username.clone(),
            restaurant_name: self.restaurant_name.clone(),
            cuisine: self.cuisine.clone(),
            location: self.location.clone(),
            review: self.review.clone(),
        }
    }

    /// Whether this record matches a delete key exactly.
    #[must_use]
    pub fn matches_key(&self, key: &RestaurantKey) -> bool {
        self.username == key.username
            && self.restaurant_name == key.restaurant_name
            && self.cuisine == key.cuisine
    }
}

/// The `(username, restaurantName, cuisine)` triple used to delete records.
///
/// Several records may share a key; deletion removes only the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantKey {
    pub username: String,
    pub restaurant_name: String,
    pub cuisine: String,
}
