//! Session middleware configuration.
//!
//! Sessions live in a `SessionStore` (`PostgreSQL` in production, memory in
//! tests) and are identified by a signed cookie.

use axum::Router;
use secrecy::ExposeSecret;
use thiserror::Error;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore, cookie::Key};

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "reviews_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// The session secret cannot be turned into a signing key.
#[derive(Debug, Error)]
#[error("invalid session signing key: {0}")]
pub struct SessionKeyError(String);

/// Wrap `router` in a session layer backed by `store`.
///
/// The session cookie is signed with `REVIEWS_SESSION_SECRET`.
///
/// # Errors
///
/// Returns `SessionKeyError` if the secret is too short to derive a key.
pub fn with_session_layer<S, Store>(
    router: Router<S>,
    store: Store,
    config: &WebConfig,
) -> Result<Router<S>, SessionKeyError>
where
    S: Clone + Send + Sync + 'static,
    Store: SessionStore + Clone,
{
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|e| SessionKeyError(e.to_string()))?;

    let layer = SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key);

    Ok(router.layer(layer))
}
