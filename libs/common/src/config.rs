//! Backend configuration
//!
//! Connection settings for the hosted backend: the project URL, the public
//! API key, the JWT secret used to verify access tokens, and the credentials
//! of the S3-compatible storage endpoint.

use crate::error::{BackendError, BackendResult};
use std::env;

/// Default project URL of a locally running backend stack
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:54321";

/// Bucket holding product images
pub const DEFAULT_BUCKET: &str = "products";

/// Object storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket name
    pub bucket: String,
    /// S3-compatible endpoint URL
    pub endpoint: String,
    /// Region reported to the S3 client
    pub region: String,
    /// S3 access key id
    pub access_key_id: String,
    /// S3 secret access key
    pub secret_access_key: String,
}

/// Backend configuration struct
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project URL (e.g., "https://xyz.supabase.co")
    pub url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    /// Secret used to verify access tokens (HS256)
    pub jwt_secret: String,
    /// Object storage settings
    pub storage: StorageConfig,
}

impl BackendConfig {
    /// Create a new BackendConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SUPABASE_URL`: project URL (default: "http://localhost:54321")
    /// - `SUPABASE_ANON_KEY`: public API key (default: empty)
    /// - `SUPABASE_JWT_SECRET`: JWT secret (default: empty)
    /// - `STORAGE_BUCKET`: bucket for product images (default: "products")
    /// - `STORAGE_S3_ENDPOINT`: S3 endpoint (default: "{SUPABASE_URL}/storage/v1/s3")
    /// - `STORAGE_S3_REGION`: S3 region (default: "local")
    /// - `STORAGE_S3_ACCESS_KEY_ID` / `STORAGE_S3_SECRET_ACCESS_KEY`: S3 credentials
    pub fn from_env() -> BackendResult<Self> {
        let url = env::var("SUPABASE_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BackendError::Configuration(format!(
                "Invalid backend URL: {}",
                url
            )));
        }

        let anon_key = env::var("SUPABASE_ANON_KEY").unwrap_or_default();
        let jwt_secret = env::var("SUPABASE_JWT_SECRET").unwrap_or_default();

        let storage = StorageConfig {
            bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
            endpoint: env::var("STORAGE_S3_ENDPOINT")
                .unwrap_or_else(|_| format!("{}/storage/v1/s3", url)),
            region: env::var("STORAGE_S3_REGION").unwrap_or_else(|_| "local".to_string()),
            access_key_id: env::var("STORAGE_S3_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: env::var("STORAGE_S3_SECRET_ACCESS_KEY").unwrap_or_default(),
        };

        Ok(Self {
            url,
            anon_key,
            jwt_secret,
            storage,
        })
    }

    /// Check that everything the hosted backend needs is present
    pub fn require_hosted(&self) -> BackendResult<()> {
        let missing: Vec<&str> = [
            ("SUPABASE_ANON_KEY", self.anon_key.is_empty()),
            ("SUPABASE_JWT_SECRET", self.jwt_secret.is_empty()),
            (
                "STORAGE_S3_ACCESS_KEY_ID",
                self.storage.access_key_id.is_empty(),
            ),
            (
                "STORAGE_S3_SECRET_ACCESS_KEY",
                self.storage.secret_access_key.is_empty(),
            ),
        ]
        .into_iter()
        .filter_map(|(name, is_missing)| is_missing.then_some(name))
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BackendError::Configuration(format!(
                "Missing environment variables: {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 8] = [
        "SUPABASE_URL",
        "SUPABASE_ANON_KEY",
        "SUPABASE_JWT_SECRET",
        "STORAGE_BUCKET",
        "STORAGE_S3_ENDPOINT",
        "STORAGE_S3_REGION",
        "STORAGE_S3_ACCESS_KEY_ID",
        "STORAGE_S3_SECRET_ACCESS_KEY",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: env-mutating tests run under #[serial]
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    #[serial]
    fn test_backend_config_defaults() {
        clear_env();
        let config = BackendConfig::from_env().expect("Failed to create backend config");
        assert_eq!(config.url, DEFAULT_BACKEND_URL);
        assert_eq!(config.storage.bucket, "products");
        assert_eq!(
            config.storage.endpoint,
            "http://localhost:54321/storage/v1/s3"
        );
        assert_eq!(config.storage.region, "local");
        assert!(config.require_hosted().is_err());
    }

    #[test]
    #[serial]
    fn test_backend_config_from_env() {
        clear_env();
        unsafe {
            env::set_var("SUPABASE_URL", "https://store.supabase.co/");
            env::set_var("SUPABASE_ANON_KEY", "anon");
            env::set_var("SUPABASE_JWT_SECRET", "secret");
            env::set_var("STORAGE_S3_ACCESS_KEY_ID", "key");
            env::set_var("STORAGE_S3_SECRET_ACCESS_KEY", "shh");
        }

        let config = BackendConfig::from_env().expect("Failed to create backend config");
        assert_eq!(config.url, "https://store.supabase.co");
        assert_eq!(
            config.storage.endpoint,
            "https://store.supabase.co/storage/v1/s3"
        );
        assert!(config.require_hosted().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_backend_config_rejects_bad_url() {
        clear_env();
        unsafe { env::set_var("SUPABASE_URL", "store.supabase.co") };
        let result = BackendConfig::from_env();
        assert!(matches!(result, Err(BackendError::Configuration(_))));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_require_hosted_lists_missing_keys() {
        clear_env();
        unsafe { env::set_var("SUPABASE_ANON_KEY", "anon") };
        let config = BackendConfig::from_env().expect("Failed to create backend config");
        let message = config.require_hosted().unwrap_err().to_string();
        assert!(!message.contains("SUPABASE_ANON_KEY"));
        assert!(message.contains("SUPABASE_JWT_SECRET"));
        clear_env();
    }
}
