//! Input validation utilities
//!
//! Only required-field checks; formats are left to the backend.

use crate::error::{PanelError, PanelResult};
use crate::messages;

/// Trimmed value of a required text field
pub fn required(value: &str, label: &str) -> PanelResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PanelError::Validation(messages::required_field(label)));
    }

    Ok(value.to_string())
}

/// Parse a required, non-negative price; accepts `,` as decimal separator
pub fn price(value: &str) -> PanelResult<f64> {
    let value = required(value, messages::FIELD_PRICE)?;

    let price: f64 = value
        .replace(',', ".")
        .parse()
        .map_err(|_| PanelError::Validation(messages::INVALID_PRICE.to_string()))?;

    if !price.is_finite() || price < 0.0 {
        return Err(PanelError::Validation(messages::INVALID_PRICE.to_string()));
    }

    Ok(price)
}

/// Checkbox values sent by forms
pub fn flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}
