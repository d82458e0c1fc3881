use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<Uuid>,
    /// Accepted on the wire and discarded; new orders always start PENDING.
    #[serde(default)]
    pub status: Option<String>,
}

/// Wire view of an order. Unmasked: the owner must be visible to staff
/// and to the owner themselves.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub items: Vec<Uuid>,
    pub status: OrderStatus,
}

impl OrderResponse {
    pub fn from_order(order: Order, items: Vec<Uuid>) -> Self {
        Self {
            id: order.id,
            owner: order.owner_id,
            items,
            status: order.status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn order_response_keeps_owner_and_status() {
        let owner = Uuid::new_v4();
        let order = Order {
            id: Uuid::new_v4(),
            owner_id: owner,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        let value =
            serde_json::to_value(OrderResponse::from_order(order, vec![Uuid::new_v4()])).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["owner"], serde_json::json!(owner));
        assert_eq!(obj["status"], serde_json::json!("PENDING"));
        assert!(obj.contains_key("id"));
        assert!(obj.contains_key("items"));
    }

    #[test]
    fn create_request_tolerates_client_supplied_status() {
        let payload: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "items": [Uuid::new_v4()],
            "status": "CONFIRMED",
        }))
        .unwrap();
        assert_eq!(payload.status.as_deref(), Some("CONFIRMED"));
    }
}
