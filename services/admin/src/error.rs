//! Custom error types for the admin service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{error::BackendError, models::OrderStatus};
use serde_json::json;
use thiserror::Error;

use crate::messages;

/// Failure of a panel operation
#[derive(Error, Debug)]
pub enum PanelError {
    /// A required field is missing or malformed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Settings update attempted before a settings row was loaded
    #[error("Site settings have not been loaded")]
    SettingsNotLoaded,

    /// Status change targeting the status the order already has
    #[error("Order is already in status {}", .0.code())]
    SameStatus(OrderStatus),

    /// Image upload failed; nothing else was submitted
    #[error("Image upload failed: {0}")]
    ImageUpload(#[source] BackendError),

    /// Image removal failed; the product row was kept
    #[error("Image removal failed: {0}")]
    ImageRemoval(#[source] BackendError),

    /// Backend query or mutation failed
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PanelError {
    /// Message shown to staff; `fallback` describes the failed action
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PanelError::Validation(message) => message.clone(),
            PanelError::SettingsNotLoaded => messages::SETTINGS_ID_NOT_FOUND.to_string(),
            PanelError::SameStatus(_) => messages::ORDER_ALREADY_IN_STATUS.to_string(),
            PanelError::ImageUpload(_) => messages::ERROR_UPLOADING_IMAGE.to_string(),
            PanelError::ImageRemoval(_) => messages::ERROR_REMOVING_IMAGE.to_string(),
            PanelError::Backend(_) => fallback.to_string(),
        }
    }

    /// HTTP error carrying `message`
    pub fn into_api_error(self, message: String) -> ApiError {
        match self {
            PanelError::Validation(_) => ApiError::BadRequest(message),
            PanelError::SettingsNotLoaded => ApiError::NotFound(message),
            PanelError::SameStatus(_) => ApiError::Conflict(message),
            PanelError::Backend(BackendError::NotFound(_)) => ApiError::NotFound(message),
            PanelError::Backend(BackendError::InvalidCredentials) => ApiError::Unauthorized(message),
            PanelError::ImageUpload(_) | PanelError::ImageRemoval(_) | PanelError::Backend(_) => {
                ApiError::BadGateway(message)
            }
        }
    }
}

/// Type alias for panel operation results
pub type PanelResult<T> = Result<T, PanelError>;

/// Custom error type for the HTTP layer
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Addressed resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request conflicts with the current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend failed or could not be reached
    #[error("Backend failure: {0}")]
    BadGateway(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                messages::ERROR_OCCURRED.to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
