//! Integration tests for the restaurant review site.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p reviews-integration-tests
//! ```
//!
//! Each test serves the full router (sessions, request credentials, request
//! IDs) on an ephemeral local port, backed by the in-memory record store and
//! session store, and drives it with a cookie-carrying `reqwest` client. No
//! database is needed, except for the ignored `postgres_store` tests, which
//! read `DATABASE_URL`:
//!
//! ```bash
//! cargo test -p reviews-integration-tests --test postgres_store -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth` - Registration, login, logout, and route gating
//! - `restaurants` - Listing, search, add, edit, and delete
//! - `health` - Health checks and request IDs
//! - `postgres_store` - SQL behaviour of the `PostgreSQL` record store

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use reqwest::{Client, Response, redirect::Policy};
use reviews_core::{Restaurant, RestaurantEntry};
use reviews_web::config::WebConfig;
use reviews_web::db::{MemoryRecordStore, RecordStore};
use reviews_web::state::AppState;
use secrecy::SecretString;
use tower_sessions::MemoryStore;

/// Signing secret used by every test server.
const TEST_SESSION_SECRET: &str =
    "k8Jd2Lq9Zp4Xv7Rt1Wm6Nb3Hc5Gf0Ys8Ue2Ia7Oo4Pl9Kj1Mh6Ng3Bf5Vd0Cx2Az";

/// A running test server plus a client that keeps its cookies.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemoryRecordStore>,
}

impl TestApp {
    /// Serve a fresh application with empty collections.
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let config = WebConfig {
            database_url: SecretString::from("postgres://unused"),
            database_name: "reviews".to_string(),
            host: addr.ip(),
            port: addr.port(),
            base_url: format!("http://{addr}"),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let store = Arc::new(MemoryRecordStore::new());
        let state = AppState::new(config, store.clone());
        let app = reviews_web::app(state, MemoryStore::default()).unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            addr,
            client,
            store,
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn register(&self, username: &str, password: &str) -> Response {
        self.post_form(
            "/register",
            &[("username", username), ("password", password)],
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    /// Register and log in `username`, leaving the session cookie in the client.
    pub async fn signed_in(username: &str) -> Self {
        let app = Self::spawn().await;
        app.register(username, "correct-horse").await;
        let response = app.login(username, "correct-horse").await;
        assert_eq!(location(&response), Some("/"));
        app
    }

    /// Insert a record directly into the store.
    pub async fn seed(&self, username: &str, name: &str, cuisine: &str) -> Restaurant {
        self.store
            .insert_restaurant(&RestaurantEntry {
                username: username.to_string(),
                restaurant_name: name.to_string(),
                cuisine: cuisine.to_string(),
                location: "Harbor Rd".to_string(),
                review: format!("Notes on {name}"),
            })
            .await
            .unwrap()
    }
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
