//! Site settings operations

use common::backend::Backend;
use common::models::{SiteSettings, UpdateSiteSettings};
use tracing::{error, info, warn};

use crate::error::{PanelError, PanelResult};

/// Settings repository
#[derive(Clone)]
pub struct SettingsRepository {
    backend: Backend,
}

impl SettingsRepository {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// The settings row, or blank defaults without an id when none exists
    pub async fn load(&self, token: &str) -> PanelResult<SiteSettings> {
        let settings = self.backend.rows.load_settings(token).await.map_err(|e| {
            error!("Failed to load site settings: {}", e);
            PanelError::from(e)
        })?;

        Ok(settings.unwrap_or_else(|| {
            warn!("No site settings row found, using blank defaults");
            SiteSettings::default()
        }))
    }

    /// Update the loaded row in place; never inserts
    pub async fn update(
        &self,
        token: &str,
        current: &SiteSettings,
        changes: &UpdateSiteSettings,
    ) -> PanelResult<SiteSettings> {
        let id = current.id.ok_or(PanelError::SettingsNotLoaded)?;

        let updated = self
            .backend
            .rows
            .update_settings(token, id, changes)
            .await
            .map_err(|e| {
                error!("Failed to update site settings {}: {}", id, e);
                PanelError::from(e)
            })?;

        info!("Updated site settings {}", id);
        Ok(updated)
    }
}
