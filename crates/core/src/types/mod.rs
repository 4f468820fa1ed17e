//! Core types for Restaurant Reviews.
//!
//! This module provides type-safe wrappers for the domain concepts stored in
//! the record store.

pub mod id;
pub mod restaurant;
pub mod search;
pub mod username;

pub use id::*;
pub use restaurant::{Restaurant, RestaurantEntry, RestaurantKey};
pub use search::SearchFilter;
pub use username::{Username, UsernameError};
