//! Order model and the status workflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::product::Product;

/// Order status, stored as its ordinal (1..=4)
///
/// The workflow is unguarded: any status may be set from any other status.
/// Only setting the status an order already has is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrderStatus {
    /// Criado
    Created = 1,
    /// Em preparação
    InPreparation = 2,
    /// Aguardando retirada
    AwaitingPickup = 3,
    /// Finalizado
    Finished = 4,
}

/// Ordinal outside of 1..=4
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown order status: {0}")]
pub struct UnknownOrderStatus(pub u8);

impl OrderStatus {
    /// All statuses in display order
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Created,
        OrderStatus::InPreparation,
        OrderStatus::AwaitingPickup,
        OrderStatus::Finished,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Display label (pt-BR)
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Created => "Criado",
            OrderStatus::InPreparation => "Em preparação",
            OrderStatus::AwaitingPickup => "Aguardando retirada",
            OrderStatus::Finished => "Finalizado",
        }
    }

    /// Whether staff may move an order from `self` to `target`
    pub fn can_change_to(self, target: OrderStatus) -> bool {
        self != target
    }

    /// Statuses selectable from `self`, in display order
    pub fn targets(self) -> impl Iterator<Item = OrderStatus> {
        Self::ALL
            .into_iter()
            .filter(move |status| self.can_change_to(*status))
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = UnknownOrderStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OrderStatus::Created),
            2 => Ok(OrderStatus::InPreparation),
            3 => Ok(OrderStatus::AwaitingPickup),
            4 => Ok(OrderStatus::Finished),
            other => Err(UnknownOrderStatus(other)),
        }
    }
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

/// Customer joined through `orders.user_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub whatsapp_number: Option<i64>,
}

/// Line item joined through `order_product`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProduct {
    pub product: Product,
    pub product_quantity: u32,
}

/// Order row with its customer and line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub full_price: f64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<Uuid>,
    pub status: OrderStatus,
    #[serde(default)]
    pub user: Option<Customer>,
    #[serde(default)]
    pub products: Vec<OrderProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordinals() {
        assert_eq!(OrderStatus::try_from(1), Ok(OrderStatus::Created));
        assert_eq!(OrderStatus::try_from(4), Ok(OrderStatus::Finished));
        assert_eq!(OrderStatus::try_from(0), Err(UnknownOrderStatus(0)));
        assert_eq!(OrderStatus::try_from(5), Err(UnknownOrderStatus(5)));
        assert_eq!(u8::from(OrderStatus::AwaitingPickup), 3);
    }

    #[test]
    fn test_any_status_except_current_is_selectable() {
        let targets: Vec<_> = OrderStatus::Finished.targets().collect();
        assert_eq!(
            targets,
            vec![
                OrderStatus::Created,
                OrderStatus::InPreparation,
                OrderStatus::AwaitingPickup
            ]
        );
        assert!(OrderStatus::Finished.can_change_to(OrderStatus::Created));
        assert!(!OrderStatus::InPreparation.can_change_to(OrderStatus::InPreparation));
    }

    #[test]
    fn test_joined_order_row() {
        let row = serde_json::json!({
            "id": "0b6f2f8e-8a55-4a57-8d0e-8b1f3f7d2c11",
            "created_at": "2025-03-28T09:30:00+00:00",
            "full_price": 25.0,
            "updated_at": null,
            "updated_by": null,
            "status": 2,
            "user_id": "c5a1b0d2-5e7f-4f1a-9b3c-2d4e6f8a0b1c",
            "user": {
                "id": "c5a1b0d2-5e7f-4f1a-9b3c-2d4e6f8a0b1c",
                "email": "cliente@example.com",
                "username": null,
                "whatsapp_number": 5511999990000i64
            },
            "products": [
                {
                    "order": "0b6f2f8e-8a55-4a57-8d0e-8b1f3f7d2c11",
                    "product_id": "7f1c4c1e-2a4b-4c7e-9d43-5c1f0c3b8a10",
                    "product_quantity": 2,
                    "product": {
                        "id": "7f1c4c1e-2a4b-4c7e-9d43-5c1f0c3b8a10",
                        "name": "Product A",
                        "description": "A",
                        "price": 10.0,
                        "image_url": null,
                        "is_highlighted": false,
                        "created_at": "2025-03-01T00:00:00+00:00"
                    }
                }
            ]
        });

        let order: Order = serde_json::from_value(row).expect("order row");
        assert_eq!(order.status, OrderStatus::InPreparation);
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[0].product_quantity, 2);
        assert_eq!(
            order.user.as_ref().and_then(|u| u.whatsapp_number),
            Some(5511999990000)
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_value::<OrderStatus>(serde_json::json!(9));
        assert!(result.is_err());
    }
}
