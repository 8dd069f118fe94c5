//! Repositories over the backend seams
//!
//! Each repository runs one panel workflow on behalf of a signed-in staff
//! member: every call takes that member's access token.

pub mod orders;
pub mod products;
pub mod settings;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use settings::SettingsRepository;
