//! Application state shared across handlers

use chrono::Duration;
use common::backend::Backend;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::middleware::TokenVerifier;
use crate::repositories::{OrderRepository, ProductRepository, SettingsRepository};
use crate::session::SessionManager;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub sessions: SessionManager,
    pub verifier: TokenVerifier,
    pub product_repository: ProductRepository,
    pub settings_repository: SettingsRepository,
    pub order_repository: OrderRepository,
    /// Body limit of the product form routes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(backend: Backend, jwt_secret: &str, notification_ttl: Duration) -> Self {
        Self {
            product_repository: ProductRepository::new(backend.clone()),
            settings_repository: SettingsRepository::new(backend.clone()),
            order_repository: OrderRepository::new(backend.clone()),
            sessions: SessionManager::new(notification_ttl),
            verifier: TokenVerifier::new(jwt_secret),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            backend,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
