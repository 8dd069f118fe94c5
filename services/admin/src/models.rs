//! Request payloads and view models for the admin service

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use common::models::{AuthUser, Product, SiteSettings, UpdateSiteSettings};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PanelResult;
use crate::format::price_label;
use crate::messages;
use crate::notifications::Notification;
use crate::validation;

pub mod orders;

pub use orders::{OrderRow, StatusAction, StatusChangeRequest};

/// Image shown when a product has none
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

/// Content type used when an upload does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Tabs of the combined panel view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PanelTab {
    #[default]
    RegisterProduct = 0,
    RegisteredProducts = 1,
    Settings = 2,
}

impl PanelTab {
    pub const ALL: [PanelTab; 3] = [
        PanelTab::RegisterProduct,
        PanelTab::RegisteredProducts,
        PanelTab::Settings,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            PanelTab::RegisterProduct => messages::TAB_REGISTER_PRODUCT,
            PanelTab::RegisteredProducts => messages::TAB_REGISTERED_PRODUCTS,
            PanelTab::Settings => messages::TAB_SETTINGS,
        }
    }
}

impl TryFrom<u8> for PanelTab {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PanelTab::RegisterProduct),
            1 => Ok(PanelTab::RegisteredProducts),
            2 => Ok(PanelTab::Settings),
            other => Err(format!("Unknown tab: {}", other)),
        }
    }
}

impl From<PanelTab> for u8 {
    fn from(tab: PanelTab) -> Self {
        tab.index()
    }
}

/// Query string of the panel view
#[derive(Debug, Default, Deserialize)]
pub struct PanelQuery {
    pub tab: Option<PanelTab>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabView {
    pub index: u8,
    pub label: &'static str,
    pub active: bool,
}

/// Image box of a product card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProductImage {
    Image { url: String },
    Placeholder { url: String },
}

/// One entry of the registered products list
#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub price_label: String,
    pub image: ProductImage,
    pub is_highlighted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<&'static str>,
    pub edit_path: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let image = match &product.image_url {
            Some(url) if !url.is_empty() => ProductImage::Image { url: url.clone() },
            _ => ProductImage::Placeholder {
                url: PLACEHOLDER_IMAGE.to_string(),
            },
        };

        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            price_label: price_label(product.price),
            image,
            is_highlighted: product.is_highlighted,
            badge: product.is_highlighted.then_some(messages::HIGHLIGHT_BADGE),
            edit_path: format!("/edit/{}", product.id),
        }
    }
}

pub fn product_cards(products: &[Product]) -> Vec<ProductCard> {
    products.iter().map(ProductCard::from).collect()
}

/// Values shown in the product form; blank in create mode
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductFormState {
    pub name: String,
    pub description: String,
    pub price: String,
    pub is_highlighted: bool,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductFormState {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: format!("{:.2}", product.price),
            is_highlighted: product.is_highlighted,
            image_url: product.image_url.clone(),
        }
    }
}

/// Uploaded image file
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw product form submission
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub is_highlighted: bool,
    pub image: Option<ImageUpload>,
}

/// Validated product input
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub is_highlighted: bool,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Read the form from a multipart body; an empty file part means no image
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = ProductForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "name" => form.name = field.text().await?,
                "description" => form.description = field.text().await?,
                "price" => form.price = field.text().await?,
                "is_highlighted" => form.is_highlighted = validation::flag(&field.text().await?),
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or(DEFAULT_CONTENT_TYPE)
                        .to_string();
                    let bytes = field.bytes().await?;

                    if !file_name.is_empty() && !bytes.is_empty() {
                        form.image = Some(ImageUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    pub fn validate(self) -> PanelResult<ProductInput> {
        Ok(ProductInput {
            name: validation::required(&self.name, messages::FIELD_NAME)?,
            description: validation::required(&self.description, messages::FIELD_DESCRIPTION)?,
            price: validation::price(&self.price)?,
            is_highlighted: self.is_highlighted,
            image: self.image,
        })
    }
}

/// Settings form submission
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub whatsapp_number: i64,
}

impl SettingsForm {
    pub fn validate(self) -> PanelResult<UpdateSiteSettings> {
        Ok(UpdateSiteSettings {
            title: validation::required(&self.title, messages::FIELD_TITLE)?,
            subtitle: validation::required(&self.subtitle, messages::FIELD_SUBTITLE)?,
            whatsapp_number: self.whatsapp_number,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginView {
    pub title: &'static str,
    pub fields: [&'static str; 2],
}

impl Default for LoginView {
    fn default() -> Self {
        Self {
            title: messages::LOGIN,
            fields: ["email", "password"],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: AuthUser,
    pub redirect_to: &'static str,
}

/// Combined panel view
#[derive(Debug, Clone, Serialize)]
pub struct PanelView {
    pub title: &'static str,
    pub tab: PanelTab,
    pub tabs: Vec<TabView>,
    pub form: ProductFormState,
    pub products: Vec<ProductCard>,
    pub settings: SiteSettings,
    pub notifications: Vec<Notification>,
}

impl PanelView {
    pub fn new(
        tab: PanelTab,
        products: &[Product],
        settings: SiteSettings,
        notifications: Vec<Notification>,
    ) -> Self {
        let tabs = PanelTab::ALL
            .into_iter()
            .map(|t| TabView {
                index: t.index(),
                label: t.label(),
                active: t == tab,
            })
            .collect();

        Self {
            title: messages::ADMIN_PANEL,
            tab,
            tabs,
            form: ProductFormState::default(),
            products: product_cards(products),
            settings,
            notifications,
        }
    }
}
