use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::cart::{CartItemsRequest, CartResponse},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Cart,
    response::ApiResponse,
    services::product_service::check_product_refs,
};

pub async fn get_cart(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<CartResponse>> {
    let cart: Option<Cart> = sqlx::query_as("SELECT * FROM carts WHERE owner_id = $1")
        .bind(user.user_id)
        .fetch_optional(pool)
        .await?;

    let cart_id = match cart {
        Some(cart) => cart.id,
        None => return Err(AppError::NotFound),
    };

    let items = fetch_items(pool, cart_id).await?;
    Ok(ApiResponse::success("Cart", CartResponse { items }))
}

/// POST/PUT: upsert the caller's cart and replace its item set with the
/// supplied one.
pub async fn replace_items(
    pool: &DbPool,
    user: &AuthUser,
    payload: CartItemsRequest,
) -> AppResult<ApiResponse<CartResponse>> {
    let items = check_product_refs(pool, &payload.items).await?;

    let mut txn = pool.begin().await?;
    let cart_id = upsert_cart(&mut txn, user.user_id).await?;

    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(&mut *txn)
        .await?;

    for product_id in &items {
        sqlx::query("INSERT INTO cart_items (cart_id, product_id) VALUES ($1, $2)")
            .bind(cart_id)
            .bind(product_id)
            .execute(&mut *txn)
            .await?;
    }
    txn.commit().await?;

    audit_cart(pool, user, "cart_replace", &items).await;

    Ok(ApiResponse::success(
        "Cart updated",
        CartResponse {
            items: items.into_iter().collect(),
        },
    ))
}

/// PATCH: upsert the caller's cart and add the supplied items to the set.
pub async fn add_items(
    pool: &DbPool,
    user: &AuthUser,
    payload: CartItemsRequest,
) -> AppResult<ApiResponse<CartResponse>> {
    let items = check_product_refs(pool, &payload.items).await?;

    let mut txn = pool.begin().await?;
    let cart_id = upsert_cart(&mut txn, user.user_id).await?;

    for product_id in &items {
        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(cart_id)
        .bind(product_id)
        .execute(&mut *txn)
        .await?;
    }
    txn.commit().await?;

    audit_cart(pool, user, "cart_add", &items).await;

    let items = fetch_items(pool, cart_id).await?;
    Ok(ApiResponse::success("Cart updated", CartResponse { items }))
}

pub async fn delete_cart(pool: &DbPool, user: &AuthUser) -> AppResult<()> {
    // cart_items go with the cart via ON DELETE CASCADE
    let result = sqlx::query("DELETE FROM carts WHERE owner_id = $1")
        .bind(user.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(pool, Some(user.user_id), "cart_delete", "carts", None).await {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

/// Get-or-create the caller's cart. The unique constraint on owner_id makes
/// this atomic under concurrent first writes.
async fn upsert_cart(
    txn: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    owner_id: Uuid,
) -> AppResult<Uuid> {
    let (cart_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO carts (id, owner_id)
        VALUES ($1, $2)
        ON CONFLICT (owner_id) DO UPDATE SET owner_id = EXCLUDED.owner_id
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .fetch_one(&mut **txn)
    .await?;

    Ok(cart_id)
}

async fn fetch_items(pool: &DbPool, cart_id: Uuid) -> AppResult<Vec<Uuid>> {
    let rows: Vec<(Uuid,)> =
        sqlx::query_as("SELECT product_id FROM cart_items WHERE cart_id = $1 ORDER BY product_id")
            .bind(cart_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

async fn audit_cart(pool: &DbPool, user: &AuthUser, action: &str, items: &BTreeSet<Uuid>) {
    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        action,
        "carts",
        Some(serde_json::json!({ "items": items })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
}
