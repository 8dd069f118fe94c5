//! Common library for the store admin panel
//!
//! This crate owns everything that touches the hosted backend: connection
//! configuration, the error taxonomy, the row and identity models, and the
//! auth/row/storage clients (plus an in-memory stand-in for all three).

pub mod backend;
pub mod config;
pub mod error;
pub mod models;

/// Example usage of the backend module
///
/// ```rust,no_run
/// use common::backend::Backend;
/// use common::config::BackendConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = BackendConfig::from_env()?;
///     let backend = Backend::hosted(&config).await?;
///     let is_healthy = backend.health_check().await?;
///     println!("Backend health check: {}", is_healthy);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
