//! Authentication middleware and extractors.
//!
//! A request is authenticated either by the user id stored in its session
//! or by `username`/`password` fields submitted in a form body.

use axum::{
    body::Body,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{Method, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::flash::push_flash;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Largest form body inspected for credentials (matches axum's default limit).
const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

/// Shown on the login page after a gated route redirects there.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Extractor that requires an authenticated user.
///
/// If nobody is logged in, queues a flash message and redirects to `/login`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// No session layer is installed.
    Unauthorized,
    /// The session or store failed while resolving the user.
    Failed(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Credentials submitted with this request were already checked
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(Self(user.clone()));
        }

        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        let stored: Option<CurrentUser> = session
            .get(session_keys::CURRENT_USER)
            .await
            .map_err(|e| AuthRejection::Failed(e.into()))?;

        let Some(stored) = stored else {
            return Err(login_required(&session).await);
        };

        let app = AppState::from_ref(state);
        match app.auth().load_user(stored.id).await {
            Ok(Some(user)) => Ok(Self(user.into())),
            Ok(None) => {
                // Account removed since login
                tracing::warn!(user_id = %stored.id, "Session refers to missing user");
                let _ = clear_current_user(&session).await;
                Err(login_required(&session).await)
            }
            Err(e) => Err(AuthRejection::Failed(e.into())),
        }
    }
}

async fn login_required(session: &Session) -> AuthRejection {
    if let Err(e) = push_flash(session, LOGIN_REQUIRED_MESSAGE).await {
        return AuthRejection::Failed(e.into());
    }
    AuthRejection::RedirectToLogin
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

/// Authenticate form posts that carry `username` and `password` fields.
///
/// Runs inside the session layer. Requests that already have a session user,
/// and the `/login` and `/register` forms themselves, pass through untouched.
/// On a credential match the user is placed in the request extensions for
/// [`RequireAuth`]; a mismatch leaves the request anonymous.
pub async fn request_credentials(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::POST
        || !is_form(&request)
        || matches!(request.uri().path(), "/login" | "/register")
    {
        return next.run(request).await;
    }

    let session = request.extensions().get::<Session>().cloned();
    if let Some(session) = session {
        match session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
        {
            Ok(Some(_)) => return next.run(request).await,
            Ok(None) => {}
            Err(e) => return AppError::from(e).into_response(),
        }
    }

    let (mut parts, body) = request.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, MAX_FORM_BYTES).await else {
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    };

    if let Some((username, password)) = form_credentials(&bytes) {
        match state
            .auth()
            .load_user_from_request(&username, &password)
            .await
        {
            Ok(Some(user)) => {
                tracing::debug!(username = %user.username, "Authenticated from form credentials");
                parts.extensions.insert(CurrentUser::from(user));
            }
            Ok(None) => tracing::debug!("Form credentials did not match"),
            Err(e) => return AppError::from(e).into_response(),
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

/// Extract a `(username, password)` pair from a urlencoded body.
fn form_credentials(body: &[u8]) -> Option<(String, String)> {
    let mut username = None;
    let mut password = None;
    for (key, value) in url::form_urlencoded::parse(body) {
        match key.as_ref() {
            "username" => username = Some(value.into_owned()),
            "password" => password = Some(value.into_owned()),
            _ => {}
        }
    }
    Some((username.filter(|u| !u.is_empty())?, password?))
}
