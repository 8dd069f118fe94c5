//! Site settings model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single `site_settings` row
///
/// `id` is `None` until a row has been loaded from the backend; the panel
/// starts from the blank default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SiteSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub whatsapp_number: i64,
}

/// Settings update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSiteSettings {
    pub title: String,
    pub subtitle: String,
    pub whatsapp_number: i64,
}
