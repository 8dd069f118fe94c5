//! Display formatting for prices, currency totals and timestamps

use chrono::{DateTime, Utc};

/// Product card price: fixed `R$` prefix, two decimals, dot separator
pub fn price_label(price: f64) -> String {
    format!("R$ {:.2}", price)
}

/// Currency total in the pt-BR locale, e.g. `R$ 1.234,56`
pub fn brl(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, fraction)
}

/// `dd/MM/yyyy HH:mm` in UTC
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}
