//! Admin service configuration
//!
//! Loaded with the `config` crate: built-in defaults, overridden by
//! `ADMIN_*` environment variables (`ADMIN_BIND_ADDRESS`, `ADMIN_BACKEND`, ...).

use config::{Config, ConfigBuilder, ConfigError, Environment, builder::DefaultState};
use serde::Deserialize;

/// Default request body limit of product forms (20 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Which backend implementation the service talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// The hosted backend-as-a-service
    Supabase,
    /// In-process backend for local runs
    Memory,
}

/// Admin service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Socket address to listen on
    pub bind_address: String,
    pub backend: BackendMode,
    /// Lifetime of a notification in milliseconds
    pub notification_ttl_ms: u64,
    /// Cron schedule of the expired-notification sweep
    pub notification_sweep_schedule: String,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Largest accepted product form body, image included
    pub max_upload_bytes: usize,
    /// Staff account seeded in memory mode
    #[serde(default)]
    pub memory_staff_email: Option<String>,
    #[serde(default)]
    pub memory_staff_password: Option<String>,
}

impl AdminConfig {
    /// Load defaults overridden by `ADMIN_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_builder(Config::builder().add_source(
            Environment::with_prefix("ADMIN").try_parsing(true),
        ))
    }

    /// Load defaults overridden by the sources already on `builder`
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("bind_address", "0.0.0.0:3001")?
            .set_default("backend", "supabase")?
            .set_default("notification_ttl_ms", 3000_i64)?
            .set_default("notification_sweep_schedule", "0/1 * * * * *")?
            .set_default("log_level", "info")?
            .set_default("max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
            .build()?
            .try_deserialize()
    }

    /// Credentials of the memory-mode staff account, when both are set
    pub fn memory_staff(&self) -> Option<(&str, &str)> {
        match (&self.memory_staff_email, &self.memory_staff_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}
