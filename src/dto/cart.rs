use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartItemsRequest {
    pub items: Vec<Uuid>,
}

/// Wire view of a cart: just the product ids. The cart id and owner are
/// dropped; the caller already knows whose cart it is.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<Uuid>,
}
