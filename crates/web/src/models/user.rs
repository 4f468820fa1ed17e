//! User domain types.
//!
//! These types represent validated domain objects separate from stored
//! documents. The password hash never leaves the record store and auth service.

use reviews_core::{UserId, Username};

/// A registered user (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-generated user ID.
    pub id: UserId,
    /// Unique username.
    pub username: Username,
}
