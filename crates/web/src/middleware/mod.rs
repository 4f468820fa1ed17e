//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, signed cookie)
//! 5. Request credentials (form-submitted username/password)

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod session;

pub use auth::{
    AuthRejection, RequireAuth, clear_current_user, request_credentials, set_current_user,
};
pub use flash::{push_flash, take_flashes};
pub use request_id::request_id_middleware;
pub use session::{SESSION_COOKIE_NAME, SessionKeyError, with_session_layer};
