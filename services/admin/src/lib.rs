//! Admin panel service for the seasonal store
//!
//! Staff sign in with their backend account, manage the product catalog
//! and the site settings, and move customer orders through their statuses.
//! All data lives in the backend-as-a-service reached through
//! [`common::backend::Backend`]; this service keeps only per-session panel
//! state and transient notifications.

pub mod config;
pub mod error;
pub mod format;
pub mod messages;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
