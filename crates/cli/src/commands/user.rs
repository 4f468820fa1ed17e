//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! reviews-cli user create -u alice -p 'correct horse battery staple'
//! ```
//!
//! # Environment Variables
//!
//! - `REVIEWS_DATABASE_URL` - `PostgreSQL` connection string
//! - `REVIEWS_DATABASE_NAME` - Schema holding the collections

use reviews_core::UserId;
use reviews_web::services::{AuthError, AuthService};
use thiserror::Error;

use super::{CommandError, connect};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Registration was rejected.
    #[error("Could not create user: {0}")]
    Auth(#[from] AuthError),
}

/// Create a new user with the same rules as the registration form.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create_user(username: &str, password: &str) -> Result<UserId, UserError> {
    let store = connect().await?;

    tracing::info!("Creating user: {}", username);
    let user = AuthService::new(&store).register(username, password).await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(user.id)
}
