//! Product image storage through the backend's S3-compatible endpoint

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    Client,
    config::{Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
};
use tracing::{error, info};

use super::ObjectStore;
use crate::config::StorageConfig;
use crate::error::{BackendError, BackendResult};

/// Public URL of an object: `{base}/storage/v1/object/public/{bucket}/{name}`
pub fn public_object_url(project_url: &str, bucket: &str, name: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        project_url.trim_end_matches('/'),
        bucket,
        name
    )
}

/// Object name behind a public URL of `bucket`
pub fn object_name_from_url(bucket: &str, url: &str) -> Option<String> {
    let marker = format!("/storage/v1/object/public/{}/", bucket);
    let start = url.find(&marker)? + marker.len();
    let name = url[start..].split(['?', '#']).next().unwrap_or_default();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// S3-backed object store
#[derive(Clone)]
pub struct S3Storage {
    s3_client: Client,
    bucket: String,
    project_url: String,
}

impl S3Storage {
    pub fn new(s3_client: Client, bucket: String, project_url: String) -> Self {
        Self {
            s3_client,
            bucket,
            project_url,
        }
    }

    /// Build an S3 client for the storage endpoint
    pub async fn connect(project_url: &str, config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "backend-storage",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .load()
            .await;

        // The storage endpoint only understands path-style addressing
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        info!(
            "Storage client initialized for bucket {} at {}",
            config.bucket, config.endpoint
        );

        Self::new(
            Client::from_conf(s3_config),
            config.bucket.clone(),
            project_url.trim_end_matches('/').to_string(),
        )
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> BackendResult<()> {
        info!("Uploading object to bucket {}: {}", self.bucket, name);

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to upload {}: {}", name, DisplayErrorContext(&e));
                BackendError::Storage(format!("upload of {} failed: {}", name, e))
            })?;

        Ok(())
    }

    async fn remove(&self, name: &str) -> BackendResult<()> {
        info!("Removing object from bucket {}: {}", self.bucket, name);

        self.s3_client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to remove {}: {}", name, DisplayErrorContext(&e));
                BackendError::Storage(format!("removal of {} failed: {}", name, e))
            })?;

        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        public_object_url(&self.project_url, &self.bucket, name)
    }

    fn object_name(&self, public_url: &str) -> Option<String> {
        object_name_from_url(&self.bucket, public_url)
    }
}
