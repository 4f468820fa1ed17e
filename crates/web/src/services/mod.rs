//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, password login, and identity loading
//! - `restaurants` - Listing, search, and record create/edit/delete
//!
//! Services borrow the record store from [`crate::state::AppState`] for the
//! duration of a request.

pub mod auth;
pub mod restaurants;

pub use auth::{AuthError, AuthService};
pub use restaurants::{DeleteOutcome, RestaurantService};
