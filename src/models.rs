use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Row structs are deliberately not `Serialize`: everything that leaves the
// process goes through the wire types in `dto`, which own the masking rules.

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Cart {
    pub id: Uuid,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Order lifecycle. PENDING is the sole entry state; nothing in this API
/// moves an order forward, that is left to the fulfilment side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivering,
    Confirmed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_wire_names_are_uppercase() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Pending).unwrap(),
            serde_json::json!("PENDING")
        );
        assert_eq!(
            serde_json::to_value(OrderStatus::Delivering).unwrap(),
            serde_json::json!("DELIVERING")
        );
        assert_eq!(
            serde_json::to_value(OrderStatus::Confirmed).unwrap(),
            serde_json::json!("CONFIRMED")
        );
    }

    #[test]
    fn new_orders_default_to_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
