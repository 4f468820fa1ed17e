//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::db::RecordStore;
use crate::services::{AuthService, RestaurantService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the record store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Web configuration
    /// * `store` - Record store holding the `users` and `restaurants` collections
    #[must_use]
    pub fn new(config: WebConfig, store: Arc<dyn RecordStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &dyn RecordStore {
        self.inner.store.as_ref()
    }

    /// Authentication service over this state's store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store())
    }

    /// Restaurant service over this state's store.
    #[must_use]
    pub fn restaurants(&self) -> RestaurantService<'_> {
        RestaurantService::new(self.store())
    }
}
