//! Order listing and the status workflow

use chrono::Utc;
use common::backend::Backend;
use common::models::{Order, OrderStatus};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{PanelError, PanelResult};

/// Order repository
#[derive(Clone)]
pub struct OrderRepository {
    backend: Backend,
}

impl OrderRepository {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Orders newest first with customer and line items
    pub async fn list(&self, token: &str) -> PanelResult<Vec<Order>> {
        self.backend.rows.list_orders(token).await.map_err(|e| {
            error!("Failed to list orders: {}", e);
            PanelError::from(e)
        })
    }

    /// Move an order to `target` and return it as stored
    ///
    /// Any status other than the current one is accepted, including moving
    /// backwards from `Finished`.
    pub async fn change_status(
        &self,
        token: &str,
        id: Uuid,
        target: OrderStatus,
        actor: Uuid,
    ) -> PanelResult<Order> {
        let mut order = self.backend.rows.get_order(token, id).await.map_err(|e| {
            error!("Failed to load order {}: {}", id, e);
            PanelError::from(e)
        })?;

        if !order.status.can_change_to(target) {
            return Err(PanelError::SameStatus(target));
        }

        self.backend
            .rows
            .update_order_status(token, id, target, actor)
            .await
            .map_err(|e| {
                error!("Failed to update status of order {}: {}", id, e);
                PanelError::from(e)
            })?;

        info!(
            "Order {} moved from {} to {} by {}",
            id,
            order.status.code(),
            target.code(),
            actor
        );

        order.status = target;
        order.updated_at = Some(Utc::now());
        order.updated_by = Some(actor);
        Ok(order)
    }
}
