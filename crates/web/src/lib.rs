//! Restaurant review site.
//!
//! This crate provides the web application as a library, allowing the
//! router to be driven in-process by tests and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::SessionStore;

use crate::middleware::SessionKeyError;
use crate::state::AppState;

/// Directory holding the stylesheet and scripts served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the application router with its full middleware stack.
///
/// Sentry layers are not included; `main` wraps the result in them.
///
/// # Errors
///
/// Returns `SessionKeyError` if the session secret cannot sign cookies.
pub fn app<Store>(state: AppState, session_store: Store) -> Result<Router, SessionKeyError>
where
    Store: SessionStore + Clone,
{
    let router = routes::routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_credentials,
        ));

    let router = middleware::with_session_layer(router, session_store, state.config())?
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http());

    Ok(router.with_state(state))
}
