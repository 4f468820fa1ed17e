//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (record store reachable)
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /register               - Register page
//! POST /register               - Register action
//! GET  /logout                 - Logout action (requires auth)
//!
//! # Restaurants (requires auth)
//! GET  /                       - All records by name
//! POST /                       - Same as GET (form credential login)
//! GET  /add                    - Add form
//! POST /addData                - Insert a record (JSON response)
//! GET  /delete                 - Delete form
//! POST /deleteData             - Delete first exact match (text response)
//! GET  /edit/{id}              - Edit form
//! POST /edit/{id}              - Persist edit
//! GET  /search                 - Search by resName, resCuisine, resUser
//! ```

pub mod auth;
pub mod health;
pub mod restaurants;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
}

/// Create the restaurant routes router.
pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(restaurants::home).post(restaurants::home))
        .route("/add", get(restaurants::add_page))
        .route("/addData", post(restaurants::add_data))
        .route("/delete", get(restaurants::delete_page))
        .route("/deleteData", post(restaurants::delete_data))
        .route(
            "/edit/{id}",
            get(restaurants::edit_page).post(restaurants::update),
        )
        .route("/search", get(restaurants::search))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(auth_routes())
        .merge(restaurant_routes())
}
