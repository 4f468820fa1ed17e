//! Authentication route handlers.
//!
//! Handles login, registration, and logout with username/password accounts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    RequireAuth, clear_current_user, push_flash, set_current_user, take_flashes,
};
use crate::models::CurrentUser;
use crate::services::AuthError;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_user: Option<String>,
    pub flashes: Vec<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<String>,
    pub flashes: Vec<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        current_user: None,
        flashes: take_flashes(&session).await,
    }
}

/// Handle login form submission.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.auth().login(&form.username, &form.password).await {
        Ok(user) => {
            // New id on privilege change
            session.cycle_id().await?;
            set_current_user(&session, &CurrentUser::from(user.clone())).await?;
            set_sentry_user(&user.id, user.username.as_str());
            push_flash(&session, "Logged in successfully.").await?;

            tracing::info!(username = %user.username, "User logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Login rejected");
            let mut flashes = take_flashes(&session).await;
            flashes.push("Invalid username or password".to_string());
            Ok(LoginTemplate {
                current_user: None,
                flashes,
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(session: Session) -> impl IntoResponse {
    RegisterTemplate {
        current_user: None,
        flashes: take_flashes(&session).await,
    }
}

/// Handle registration form submission.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let message = match state.auth().register(&form.username, &form.password).await {
        Ok(_) => {
            push_flash(&session, "Registration successful. Please log in.").await?;
            return Ok(Redirect::to("/login").into_response());
        }
        Err(AuthError::UserAlreadyExists) => "Username already exists".to_string(),
        Err(AuthError::InvalidUsername(e)) => format!("Invalid username: {e}"),
        Err(AuthError::WeakPassword(msg)) => format!("Invalid password: {msg}"),
        Err(e) => return Err(AppError::from(e)),
    };

    tracing::warn!(reason = %message, "Registration rejected");
    let mut flashes = take_flashes(&session).await;
    flashes.push(message);
    Ok(RegisterTemplate {
        current_user: None,
        flashes,
    }
    .into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn logout(RequireAuth(user): RequireAuth, session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    session.cycle_id().await?;
    clear_sentry_user();
    push_flash(&session, "You have been logged out.").await?;

    tracing::info!(username = %user.username, "User logged out");
    Ok(Redirect::to("/"))
}
