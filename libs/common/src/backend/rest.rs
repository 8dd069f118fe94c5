//! Row client for the hosted REST endpoint (`/rest/v1`)
//!
//! Filters and ordering use the endpoint's query syntax
//! (`id=eq.{id}`, `order=name.asc`). Every request carries the project API
//! key and the signed-in user's access token, so row-level policies apply.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use super::RowStore;
use crate::error::{BackendError, BackendResult};
use crate::models::{
    NewProduct, Order, OrderStatus, Product, SiteSettings, UpdateProduct, UpdateSiteSettings,
};

/// Select clause joining customers and line items onto orders
pub const ORDER_SELECT: &str = "*,user:user_id(id,email,username,whatsapp_number),products:order_product(*,product:product_id(*))";

/// Error body of the REST and auth endpoints
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

/// Turn a non-success response into a `BackendError`
pub(crate) async fn rejection(response: Response) -> BackendError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        });

    classify(status, message)
}

/// Map a status code and message onto the error taxonomy
pub(crate) fn classify(status: StatusCode, message: String) -> BackendError {
    match status {
        // 406 is what a single-object request answers when no row matched
        StatusCode::NOT_FOUND | StatusCode::NOT_ACCEPTABLE => BackendError::NotFound(message),
        _ => BackendError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

/// Client for the REST endpoint
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(http: Client, project_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn with_auth(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    /// Send a request and decode a JSON body
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    /// Send a request whose body we do not need
    async fn execute(&self, request: RequestBuilder) -> BackendResult<()> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    /// First row of a `return=representation` mutation
    fn first_row<T>(rows: Vec<T>, what: &str) -> BackendResult<T> {
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(what.to_string()))
    }
}

#[async_trait]
impl RowStore for RestClient {
    async fn list_products(&self, token: &str) -> BackendResult<Vec<Product>> {
        let request = self
            .http
            .get(self.table_url("products"))
            .query(&[("select", "*"), ("order", "name.asc")]);

        self.fetch(self.with_auth(request, token)).await
    }

    async fn get_product(&self, token: &str, id: Uuid) -> BackendResult<Product> {
        let request = self
            .http
            .get(self.table_url("products"))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]);

        let rows: Vec<Product> = self.fetch(self.with_auth(request, token)).await?;
        Self::first_row(rows, &format!("product {}", id))
    }

    async fn insert_product(&self, token: &str, product: &NewProduct) -> BackendResult<Product> {
        info!("Inserting product: {}", product.name);

        let request = self
            .http
            .post(self.table_url("products"))
            .header("Prefer", "return=representation")
            .json(&[product]);

        let rows: Vec<Product> = self.fetch(self.with_auth(request, token)).await?;
        Self::first_row(rows, "inserted product")
    }

    async fn update_product(
        &self,
        token: &str,
        id: Uuid,
        changes: &UpdateProduct,
    ) -> BackendResult<Product> {
        info!("Updating product: {}", id);

        let request = self
            .http
            .patch(self.table_url("products"))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(changes);

        let rows: Vec<Product> = self.fetch(self.with_auth(request, token)).await?;
        Self::first_row(rows, &format!("product {}", id))
    }

    async fn delete_product(&self, token: &str, id: Uuid) -> BackendResult<()> {
        info!("Deleting product: {}", id);

        let request = self
            .http
            .delete(self.table_url("products"))
            .query(&[("id", format!("eq.{}", id))]);

        self.execute(self.with_auth(request, token)).await
    }

    async fn load_settings(&self, token: &str) -> BackendResult<Option<SiteSettings>> {
        let request = self
            .http
            .get(self.table_url("site_settings"))
            .query(&[("select", "*"), ("limit", "1")]);

        let rows: Vec<SiteSettings> = self.fetch(self.with_auth(request, token)).await?;
        Ok(rows.into_iter().next())
    }

    async fn update_settings(
        &self,
        token: &str,
        id: Uuid,
        changes: &UpdateSiteSettings,
    ) -> BackendResult<SiteSettings> {
        info!("Updating site settings: {}", id);

        let request = self
            .http
            .patch(self.table_url("site_settings"))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(changes);

        let rows: Vec<SiteSettings> = self.fetch(self.with_auth(request, token)).await?;
        Self::first_row(rows, &format!("site settings {}", id))
    }

    async fn list_orders(&self, token: &str) -> BackendResult<Vec<Order>> {
        let request = self
            .http
            .get(self.table_url("orders"))
            .query(&[("select", ORDER_SELECT), ("order", "created_at.desc")]);

        self.fetch(self.with_auth(request, token)).await
    }

    async fn get_order(&self, token: &str, id: Uuid) -> BackendResult<Order> {
        let request = self.http.get(self.table_url("orders")).query(&[
            ("select", ORDER_SELECT.to_string()),
            ("id", format!("eq.{}", id)),
        ]);

        let rows: Vec<Order> = self.fetch(self.with_auth(request, token)).await?;
        Self::first_row(rows, &format!("order {}", id))
    }

    async fn update_order_status(
        &self,
        token: &str,
        id: Uuid,
        status: OrderStatus,
        updated_by: Uuid,
    ) -> BackendResult<()> {
        info!("Setting order {} to status {}", id, status.code());

        let request = self
            .http
            .patch(self.table_url("orders"))
            .query(&[("id", format!("eq.{}", id))])
            .json(&json!({
                "status": status,
                "updated_at": Utc::now(),
                "updated_by": updated_by,
            }));

        self.execute(self.with_auth(request, token)).await
    }

    async fn health_check(&self) -> BackendResult<bool> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| {
                error!("Backend health check failed: {}", e);
                BackendError::from(e)
            })?;

        Ok(response.status().is_success())
    }
}
