use axum::Router;

use crate::db::DbPool;

pub mod auth;
pub mod cart;
pub mod doc;
pub mod health;
pub mod orders;
pub mod products;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<DbPool> {
    Router::new()
        .merge(products::router())
        .merge(cart::router())
        .merge(orders::router())
        .nest("/auth", auth::router())
}
