use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::orders::{CreateOrderRequest, OrderList, OrderResponse},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderStatus},
    response::ApiResponse,
    services::product_service::check_product_refs,
};

#[derive(FromRow)]
struct OrderWithOwnerRow {
    id: Uuid,
    owner_id: Uuid,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    owner_is_staff: bool,
}

pub async fn list_orders(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE owner_id = $1 ORDER BY created_at DESC")
            .bind(user.user_id)
            .fetch_all(pool)
            .await?;

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
        "SELECT order_id, product_id FROM order_items WHERE order_id = ANY($1) ORDER BY product_id",
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let mut items_by_order: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (order_id, product_id) in rows {
        items_by_order.entry(order_id).or_default().push(product_id);
    }

    let items = orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            OrderResponse::from_order(order, items)
        })
        .collect();

    Ok(ApiResponse::success("Orders", OrderList { items }))
}

pub async fn create_order(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderResponse>> {
    let items = check_product_refs(pool, &payload.items).await?;

    let mut txn = pool.begin().await?;

    // Owner and status come from the server, never from the payload.
    let order: Order = sqlx::query_as(
        "INSERT INTO orders (id, owner_id, status) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(OrderStatus::Pending)
    .fetch_one(&mut *txn)
    .await?;

    for product_id in &items {
        sqlx::query("INSERT INTO order_items (order_id, product_id) VALUES ($1, $2)")
            .bind(order.id)
            .bind(product_id)
            .execute(&mut *txn)
            .await?;
    }
    txn.commit().await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "order_create",
        "orders",
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        OrderResponse::from_order(order, items.into_iter().collect()),
    ))
}

pub async fn get_order(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderResponse>> {
    let row = fetch_visible(pool, user, id).await?;

    let items = fetch_items(pool, row.id).await?;
    let order = Order {
        id: row.id,
        owner_id: row.owner_id,
        status: row.status,
        created_at: row.created_at,
    };

    Ok(ApiResponse::success(
        "Order",
        OrderResponse::from_order(order, items),
    ))
}

pub async fn delete_order(pool: &DbPool, user: &AuthUser, id: Uuid) -> AppResult<()> {
    let row = fetch_visible(pool, user, id).await?;

    sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(row.id)
        .execute(pool)
        .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "order_delete",
        "orders",
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

/// Load an order and apply the read/delete gate: the caller must own it,
/// or the order's owner must be staff. Any denial is a 404 so a rejected
/// caller cannot tell a real id from a made-up one.
async fn fetch_visible(pool: &DbPool, user: &AuthUser, id: Uuid) -> AppResult<OrderWithOwnerRow> {
    let row: Option<OrderWithOwnerRow> = sqlx::query_as(
        r#"
        SELECT o.id, o.owner_id, o.status, o.created_at, u.is_staff AS owner_is_staff
        FROM orders o
        JOIN users u ON u.id = o.owner_id
        WHERE o.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let row = match row {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    if row.owner_id != user.user_id && !row.owner_is_staff {
        return Err(AppError::NotFound);
    }

    Ok(row)
}

async fn fetch_items(pool: &DbPool, order_id: Uuid) -> AppResult<Vec<Uuid>> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        "SELECT product_id FROM order_items WHERE order_id = $1 ORDER BY product_id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}
