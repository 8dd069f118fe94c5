//! Order list view models

use common::models::{Order, OrderStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::{brl, timestamp};
use crate::messages;

/// Status control of an order row; the current status is disabled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusAction {
    pub status: OrderStatus,
    pub label: &'static str,
    pub enabled: bool,
}

/// One order as listed
#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub id: Uuid,
    pub created_at: String,
    pub customer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    pub items: Vec<String>,
    pub total: String,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub actions: Vec<StatusAction>,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        let customer = order
            .user
            .as_ref()
            .and_then(|user| {
                user.username
                    .as_deref()
                    .filter(|name| !name.trim().is_empty())
                    .or_else(|| Some(user.email.as_str()).filter(|email| !email.trim().is_empty()))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| messages::USER_NOT_FOUND.to_string());

        let whatsapp = order
            .user
            .as_ref()
            .and_then(|user| user.whatsapp_number)
            .filter(|number| *number != 0)
            .map(|number| format!("WhatsApp: {}", number));

        let items = order
            .products
            .iter()
            .map(|item| format!("{} x {}", item.product.name, item.product_quantity))
            .collect();

        let actions = OrderStatus::ALL
            .into_iter()
            .map(|status| StatusAction {
                status,
                label: status.label(),
                enabled: order.status.can_change_to(status),
            })
            .collect();

        Self {
            id: order.id,
            created_at: timestamp(order.created_at),
            customer,
            whatsapp,
            items,
            total: brl(order.full_price),
            status: order.status,
            status_label: order.status.label(),
            actions,
        }
    }
}

pub fn order_rows(orders: &[Order]) -> Vec<OrderRow> {
    orders.iter().map(OrderRow::from).collect()
}

/// Status change request; the ordinal is checked by the handler
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChangeRequest {
    pub status: u8,
}
