//! Product catalog operations

use chrono::{DateTime, Utc};
use common::backend::Backend;
use common::models::{NewProduct, Product, UpdateProduct};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{PanelError, PanelResult};
use crate::models::{ImageUpload, ProductInput};

/// Object name of a newly uploaded image: `{unix_millis}-{file_name}`
pub fn image_object_name(file_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        now.timestamp_millis(),
        file_name.replace(['/', '\\'], "_")
    )
}

/// Product repository
#[derive(Clone)]
pub struct ProductRepository {
    backend: Backend,
}

impl ProductRepository {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// All products, name ascending
    pub async fn list(&self, token: &str) -> PanelResult<Vec<Product>> {
        self.backend.rows.list_products(token).await.map_err(|e| {
            error!("Failed to list products: {}", e);
            PanelError::from(e)
        })
    }

    pub async fn get(&self, token: &str, id: Uuid) -> PanelResult<Product> {
        self.backend.rows.get_product(token, id).await.map_err(|e| {
            error!("Failed to load product {}: {}", id, e);
            PanelError::from(e)
        })
    }

    /// Upload the image, if any, then insert the row referencing it
    pub async fn create(&self, token: &str, input: ProductInput, actor: Uuid) -> PanelResult<Product> {
        let image_url = match &input.image {
            Some(image) => {
                let name = image_object_name(&image.file_name, Utc::now());
                Some(self.upload(&name, image).await?)
            }
            None => None,
        };

        let product = NewProduct {
            name: input.name,
            description: input.description,
            price: input.price,
            image_url,
            is_highlighted: input.is_highlighted,
            updated_by: actor,
        };

        let created = self
            .backend
            .rows
            .insert_product(token, &product)
            .await
            .map_err(|e| {
                error!("Failed to insert product: {}", e);
                PanelError::from(e)
            })?;

        info!("Created product {} by {}", created.id, actor);
        Ok(created)
    }

    /// Update a product; a new image overwrites the existing object in place
    pub async fn update(
        &self,
        token: &str,
        id: Uuid,
        input: ProductInput,
        actor: Uuid,
    ) -> PanelResult<Product> {
        let existing = self.get(token, id).await?;

        let image_url = match &input.image {
            Some(image) => {
                let reused = existing
                    .image_url
                    .as_deref()
                    .and_then(|url| self.backend.storage.object_name(url));

                match reused {
                    Some(name) => {
                        self.upload(&name, image).await?;
                        existing.image_url.clone()
                    }
                    None => {
                        let name = image_object_name(&image.file_name, Utc::now());
                        Some(self.upload(&name, image).await?)
                    }
                }
            }
            None => None,
        };

        let changes = UpdateProduct {
            name: Some(input.name),
            description: Some(input.description),
            price: Some(input.price),
            image_url,
            is_highlighted: Some(input.is_highlighted),
            updated_at: Some(Utc::now()),
            updated_by: Some(actor),
        };

        let updated = self
            .backend
            .rows
            .update_product(token, id, &changes)
            .await
            .map_err(|e| {
                error!("Failed to update product {}: {}", id, e);
                PanelError::from(e)
            })?;

        info!("Updated product {} by {}", id, actor);
        Ok(updated)
    }

    /// Remove the stored image, then the row; a failed removal keeps the row
    pub async fn delete(&self, token: &str, id: Uuid) -> PanelResult<()> {
        let product = self.get(token, id).await?;

        if let Some(url) = product.image_url.as_deref().filter(|url| !url.is_empty()) {
            match self.backend.storage.object_name(url) {
                Some(name) => {
                    self.backend.storage.remove(&name).await.map_err(|e| {
                        error!("Failed to remove image {} of product {}: {}", name, id, e);
                        PanelError::ImageRemoval(e)
                    })?;
                }
                None => warn!("Image of product {} is outside the bucket: {}", id, url),
            }
        }

        self.backend
            .rows
            .delete_product(token, id)
            .await
            .map_err(|e| {
                error!("Failed to delete product {}: {}", id, e);
                PanelError::from(e)
            })?;

        info!("Deleted product {}", id);
        Ok(())
    }

    /// Store an image and return its public URL
    async fn upload(&self, name: &str, image: &ImageUpload) -> PanelResult<String> {
        self.backend
            .storage
            .upload(name, image.bytes.clone(), &image.content_type)
            .await
            .map_err(|e| {
                error!("Failed to upload image {}: {}", name, e);
                PanelError::ImageUpload(e)
            })?;

        Ok(self.backend.storage.public_url(name))
    }
}
