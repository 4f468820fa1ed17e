//! One-shot flash messages carried in the session.
//!
//! Messages queued with [`push_flash`] are shown on the next rendered page
//! and then discarded.

use tower_sessions::Session;

use crate::models::session_keys;

/// Queue a message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn push_flash(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut messages: Vec<String> = session
        .get(session_keys::FLASH)
        .await?
        .unwrap_or_default();
    messages.push(message.into());
    session.insert(session_keys::FLASH, messages).await
}

/// Remove and return all queued messages.
///
/// A session that cannot be read yields no messages.
pub async fn take_flashes(session: &Session) -> Vec<String> {
    session
        .remove::<Vec<String>>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flashes_are_taken_once() {
        let session = session();
        push_flash(&session, "first").await.unwrap();
        push_flash(&session, "second").await.unwrap();

        assert_eq!(take_flashes(&session).await, ["first", "second"]);
        assert!(take_flashes(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_session_has_no_flashes() {
        assert!(take_flashes(&session()).await.is_empty());
    }
}
