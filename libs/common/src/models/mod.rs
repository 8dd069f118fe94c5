//! Row and identity models shared by the backend clients and the panel

pub mod order;
pub mod product;
pub mod settings;
pub mod user;

// Re-export for convenience
pub use order::{Customer, Order, OrderProduct, OrderStatus, UnknownOrderStatus};
pub use product::{NewProduct, Product, UpdateProduct};
pub use settings::{SiteSettings, UpdateSiteSettings};
pub use user::{AccessClaims, AuthSession, AuthUser, TOKEN_AUDIENCE};
