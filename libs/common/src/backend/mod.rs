//! Backend-as-a-service surface
//!
//! The panel never talks to a database directly. Everything goes through
//! three seams owned by the hosted backend:
//!
//! - [`AuthBackend`]: email/password sign-in and sign-out
//! - [`RowStore`]: row queries and mutations on `products`, `site_settings`
//!   and `orders`
//! - [`ObjectStore`]: the bucket holding product images
//!
//! [`Backend`] bundles one implementation of each. The hosted implementation
//! lives in [`auth`], [`rest`] and [`storage`]; [`memory`] keeps everything
//! in process.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::error::BackendResult;
use crate::models::{
    AuthSession, NewProduct, Order, OrderStatus, Product, SiteSettings, UpdateProduct,
    UpdateSiteSettings,
};

pub mod auth;
pub mod memory;
pub mod rest;
pub mod storage;

pub use auth::AuthClient;
pub use memory::{MemoryBackend, MemoryOp};
pub use rest::RestClient;
pub use storage::S3Storage;

/// Email/password authentication
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange an email/password pair for a session
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthSession>;

    /// Revoke the session behind an access token
    async fn sign_out(&self, access_token: &str) -> BackendResult<()>;
}

/// Row access, always on behalf of a signed-in user
#[async_trait]
pub trait RowStore: Send + Sync {
    /// All products ordered by name ascending
    async fn list_products(&self, token: &str) -> BackendResult<Vec<Product>>;

    async fn get_product(&self, token: &str, id: Uuid) -> BackendResult<Product>;

    async fn insert_product(&self, token: &str, product: &NewProduct) -> BackendResult<Product>;

    async fn update_product(
        &self,
        token: &str,
        id: Uuid,
        changes: &UpdateProduct,
    ) -> BackendResult<Product>;

    async fn delete_product(&self, token: &str, id: Uuid) -> BackendResult<()>;

    /// The settings row, if one exists
    async fn load_settings(&self, token: &str) -> BackendResult<Option<SiteSettings>>;

    async fn update_settings(
        &self,
        token: &str,
        id: Uuid,
        changes: &UpdateSiteSettings,
    ) -> BackendResult<SiteSettings>;

    /// Orders newest first, with customer and line items
    async fn list_orders(&self, token: &str) -> BackendResult<Vec<Order>>;

    async fn get_order(&self, token: &str, id: Uuid) -> BackendResult<Order>;

    async fn update_order_status(
        &self,
        token: &str,
        id: Uuid,
        status: OrderStatus,
        updated_by: Uuid,
    ) -> BackendResult<()>;

    /// Check that the row endpoint is reachable
    async fn health_check(&self) -> BackendResult<bool>;
}

/// Image bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `name`, replacing any existing object
    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> BackendResult<()>;

    async fn remove(&self, name: &str) -> BackendResult<()>;

    /// Public URL of an object; a pure derivation from its name
    fn public_url(&self, name: &str) -> String;

    /// Inverse of [`ObjectStore::public_url`]; `None` for URLs outside this bucket
    fn object_name(&self, public_url: &str) -> Option<String>;
}

/// One implementation of each backend seam
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthBackend>,
    pub rows: Arc<dyn RowStore>,
    pub storage: Arc<dyn ObjectStore>,
}

impl Backend {
    /// Connect to the hosted backend
    pub async fn hosted(config: &BackendConfig) -> BackendResult<Self> {
        config.require_hosted()?;

        let http = reqwest::Client::builder().build()?;
        let auth = AuthClient::new(http.clone(), &config.url, &config.anon_key);
        let rows = RestClient::new(http, &config.url, &config.anon_key);
        let storage = S3Storage::connect(&config.url, &config.storage).await;

        Ok(Self {
            auth: Arc::new(auth),
            rows: Arc::new(rows),
            storage: Arc::new(storage),
        })
    }

    /// Serve every seam from one in-memory backend
    pub fn memory(backend: MemoryBackend) -> Self {
        Self {
            auth: Arc::new(backend.clone()),
            rows: Arc::new(backend.clone()),
            storage: Arc::new(backend),
        }
    }

    /// Check backend connectivity
    pub async fn health_check(&self) -> BackendResult<bool> {
        self.rows.health_check().await
    }
}
