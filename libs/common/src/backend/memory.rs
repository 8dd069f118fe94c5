//! In-process backend
//!
//! Implements every seam on top of plain collections guarded by one mutex.
//! Tokens are real HS256 JWTs signed with the configured secret, so the
//! panel verifies them exactly as it verifies hosted tokens.
//!
//! Two test hooks: [`MemoryBackend::fail_next`] makes the next call of an
//! operation fail, and [`MemoryBackend::calls`] returns every operation
//! attempted so far, in order.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::storage::{object_name_from_url, public_object_url};
use super::{AuthBackend, ObjectStore, RowStore};
use crate::error::{BackendError, BackendResult};
use crate::models::{
    AccessClaims, AuthSession, AuthUser, NewProduct, Order, OrderStatus, Product, SiteSettings,
    TOKEN_AUDIENCE, UpdateProduct, UpdateSiteSettings,
};

/// Access token lifetime in seconds
const TOKEN_TTL_SECONDS: u64 = 3600;

/// Operations recorded by the in-memory backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryOp {
    SignIn,
    SignOut,
    ListProducts,
    GetProduct,
    InsertProduct,
    UpdateProduct,
    DeleteProduct,
    LoadSettings,
    UpdateSettings,
    ListOrders,
    GetOrder,
    UpdateOrderStatus,
    Upload,
    Remove,
    HealthCheck,
}

/// A stored object
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug)]
struct StaffAccount {
    id: Uuid,
    password: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<String, StaffAccount>,
    products: HashMap<Uuid, Product>,
    settings: Option<SiteSettings>,
    orders: HashMap<Uuid, Order>,
    objects: BTreeMap<String, StoredObject>,
    failures: HashSet<MemoryOp>,
    calls: Vec<MemoryOp>,
}

impl MemoryState {
    /// Record a call and consume a pending failure for it
    fn enter(&mut self, op: MemoryOp) -> BackendResult<()> {
        self.calls.push(op);
        if self.failures.remove(&op) {
            return Err(BackendError::Network(format!("simulated {:?} failure", op)));
        }
        Ok(())
    }
}

/// In-memory backend
#[derive(Clone)]
pub struct MemoryBackend {
    jwt_secret: String,
    project_url: String,
    bucket: String,
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new(jwt_secret: &str, project_url: &str, bucket: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            project_url: project_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// Register a staff account and return its user id
    pub async fn add_staff(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().await.accounts.insert(
            email.to_lowercase(),
            StaffAccount {
                id,
                password: password.to_string(),
            },
        );
        id
    }

    pub async fn seed_product(&self, product: Product) {
        self.state
            .lock()
            .await
            .products
            .insert(product.id, product);
    }

    pub async fn seed_settings(&self, settings: SiteSettings) {
        self.state.lock().await.settings = Some(settings);
    }

    pub async fn seed_order(&self, order: Order) {
        self.state.lock().await.orders.insert(order.id, order);
    }

    pub async fn seed_object(&self, name: &str, bytes: Vec<u8>, content_type: &str) {
        self.state.lock().await.objects.insert(
            name.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
    }

    /// Make the next call of `op` fail with a network error
    pub async fn fail_next(&self, op: MemoryOp) {
        self.state.lock().await.failures.insert(op);
    }

    /// Every operation attempted so far, in order
    pub async fn calls(&self) -> Vec<MemoryOp> {
        self.state.lock().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    pub async fn product(&self, id: Uuid) -> Option<Product> {
        self.state.lock().await.products.get(&id).cloned()
    }

    pub async fn settings(&self) -> Option<SiteSettings> {
        self.state.lock().await.settings.clone()
    }

    pub async fn order(&self, id: Uuid) -> Option<Order> {
        self.state.lock().await.orders.get(&id).cloned()
    }

    pub async fn object(&self, name: &str) -> Option<StoredObject> {
        self.state.lock().await.objects.get(name).cloned()
    }

    /// Names of all stored objects, sorted
    pub async fn object_names(&self) -> Vec<String> {
        self.state.lock().await.objects.keys().cloned().collect()
    }

    fn issue_token(&self, user: &AuthUser) -> BackendResult<String> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            aud: TOKEN_AUDIENCE.to_string(),
            role: Some(TOKEN_AUDIENCE.to_string()),
            iat: now,
            exp: now + TOKEN_TTL_SECONDS,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| BackendError::Configuration(format!("Failed to sign token: {}", e)))
    }
}

#[async_trait]
impl AuthBackend for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthSession> {
        let user = {
            let mut state = self.state.lock().await;
            state.enter(MemoryOp::SignIn)?;

            match state.accounts.get(&email.to_lowercase()) {
                Some(account) if account.password == password => AuthUser {
                    id: account.id,
                    email: Some(email.to_string()),
                },
                _ => return Err(BackendError::InvalidCredentials),
            }
        };

        info!("Signed in staff member {}", user.id);
        Ok(AuthSession {
            access_token: self.issue_token(&user)?,
            refresh_token: Uuid::new_v4().to_string(),
            expires_in: TOKEN_TTL_SECONDS,
            user,
        })
    }

    async fn sign_out(&self, _access_token: &str) -> BackendResult<()> {
        self.state.lock().await.enter(MemoryOp::SignOut)
    }
}

#[async_trait]
impl RowStore for MemoryBackend {
    async fn list_products(&self, _token: &str) -> BackendResult<Vec<Product>> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::ListProducts)?;

        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn get_product(&self, _token: &str, id: Uuid) -> BackendResult<Product> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::GetProduct)?;

        state
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("product {}", id)))
    }

    async fn insert_product(&self, _token: &str, product: &NewProduct) -> BackendResult<Product> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::InsertProduct)?;

        let now = Utc::now();
        let row = Product {
            id: Uuid::new_v4(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            is_highlighted: product.is_highlighted,
            created_at: now,
            updated_at: Some(now),
            updated_by: Some(product.updated_by),
        };
        state.products.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_product(
        &self,
        _token: &str,
        id: Uuid,
        changes: &UpdateProduct,
    ) -> BackendResult<Product> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::UpdateProduct)?;

        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(format!("product {}", id)))?;
        changes.apply_to(product);
        Ok(product.clone())
    }

    async fn delete_product(&self, _token: &str, id: Uuid) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::DeleteProduct)?;

        // Deleting an absent row is not an error on the REST endpoint either
        state.products.remove(&id);
        Ok(())
    }

    async fn load_settings(&self, _token: &str) -> BackendResult<Option<SiteSettings>> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::LoadSettings)?;
        Ok(state.settings.clone())
    }

    async fn update_settings(
        &self,
        _token: &str,
        id: Uuid,
        changes: &UpdateSiteSettings,
    ) -> BackendResult<SiteSettings> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::UpdateSettings)?;

        match state.settings.as_mut() {
            Some(settings) if settings.id == Some(id) => {
                settings.title = changes.title.clone();
                settings.subtitle = changes.subtitle.clone();
                settings.whatsapp_number = changes.whatsapp_number;
                Ok(settings.clone())
            }
            _ => Err(BackendError::NotFound(format!("site settings {}", id))),
        }
    }

    async fn list_orders(&self, _token: &str) -> BackendResult<Vec<Order>> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::ListOrders)?;

        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn get_order(&self, _token: &str, id: Uuid) -> BackendResult<Order> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::GetOrder)?;

        state
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("order {}", id)))
    }

    async fn update_order_status(
        &self,
        _token: &str,
        id: Uuid,
        status: OrderStatus,
        updated_by: Uuid,
    ) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(MemoryOp::UpdateOrderStatus)?;

        let order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(format!("order {}", id)))?;
        order.status = status;
        order.updated_at = Some(Utc::now());
        order.updated_by = Some(updated_by);
        Ok(())
    }

    async fn health_check(&self) -> BackendResult<bool> {
        self.state.lock().await.enter(MemoryOp::HealthCheck)?;
        Ok(true)
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state
            .enter(MemoryOp::Upload)
            .map_err(|e| BackendError::Storage(e.to_string()))?;

        state.objects.insert(
            name.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn remove(&self, name: &str) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state
            .enter(MemoryOp::Remove)
            .map_err(|e| BackendError::Storage(e.to_string()))?;

        state.objects.remove(name);
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        public_object_url(&self.project_url, &self.bucket, name)
    }

    fn object_name(&self, public_url: &str) -> Option<String> {
        object_name_from_url(&self.bucket, public_url)
    }
}
