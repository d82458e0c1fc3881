use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::products::{CreateProductRequest, ProductList, ProductResponse, UpdateProductRequest},
    error::{AppError, AppResult, FieldError},
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
};

pub async fn list_products(pool: &DbPool) -> AppResult<ApiResponse<ProductList>> {
    let items: Vec<Product> = sqlx::query_as("SELECT * FROM products ORDER BY created_at")
        .fetch_all(pool)
        .await?;

    let data = ProductList {
        items: items.into_iter().map(ProductResponse::from).collect(),
    };
    Ok(ApiResponse::success("Products", data))
}

pub async fn get_product(pool: &DbPool, id: Uuid) -> AppResult<ApiResponse<ProductResponse>> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success("Product", ProductResponse::from(product)))
}

pub async fn create_product(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductResponse>> {
    payload.validate()?;

    // Whatever owner the client sent, the creator becomes the owner.
    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, owner_id, name, description, image_url, price, stock)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.image_url)
    .bind(payload.price)
    .bind(payload.stock)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "product_create",
        "products",
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        ProductResponse::from(product),
    ))
}

pub async fn replace_product(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductResponse>> {
    payload.validate()?;
    let existing = fetch_owned(pool, user, id).await?;

    // owner_id is re-set to the caller on every write, so ownership can
    // never be transferred even if the payload carried an owner field.
    let product: Product = sqlx::query_as(
        r#"
        UPDATE products
        SET owner_id = $2, name = $3, description = $4, image_url = $5, price = $6, stock = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(user.user_id)
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.image_url)
    .bind(payload.price)
    .bind(payload.stock)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Updated", ProductResponse::from(product)))
}

pub async fn update_product(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<ProductResponse>> {
    payload.validate()?;
    let existing = fetch_owned(pool, user, id).await?;

    let name = payload.name.unwrap_or(existing.name);
    let description = payload.description.unwrap_or(existing.description);
    let image_url = payload.image_url.unwrap_or(existing.image_url);
    let price = payload.price.unwrap_or(existing.price);
    let stock = payload.stock.unwrap_or(existing.stock);

    let product: Product = sqlx::query_as(
        r#"
        UPDATE products
        SET owner_id = $2, name = $3, description = $4, image_url = $5, price = $6, stock = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(user.user_id)
    .bind(name)
    .bind(description)
    .bind(image_url)
    .bind(price)
    .bind(stock)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Updated", ProductResponse::from(product)))
}

pub async fn delete_product(pool: &DbPool, user: &AuthUser, id: Uuid) -> AppResult<()> {
    let existing = fetch_owned(pool, user, id).await?;

    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(existing.id)
        .execute(pool)
        .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "product_delete",
        "products",
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

/// Dedupe a list of product references into a set and reject ids that do
/// not refer to an existing product. Shared by the cart and order relation
/// writes.
pub(crate) async fn check_product_refs(pool: &DbPool, items: &[Uuid]) -> AppResult<BTreeSet<Uuid>> {
    let requested: BTreeSet<Uuid> = items.iter().copied().collect();
    if requested.is_empty() {
        return Ok(requested);
    }

    let ids: Vec<Uuid> = requested.iter().copied().collect();
    let found: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = ANY($1)")
        .bind(&ids)
        .fetch_all(pool)
        .await?;
    let found: BTreeSet<Uuid> = found.into_iter().map(|(id,)| id).collect();

    let errors: Vec<FieldError> = requested
        .difference(&found)
        .map(|id| FieldError::new("items", format!("unknown product {id}")))
        .collect();

    if errors.is_empty() {
        Ok(requested)
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Load a product and check the caller owns it. Missing product is a 404;
/// someone else's product is a 403 (reads stay public, so existence is not
/// a secret here).
async fn fetch_owned(pool: &DbPool, user: &AuthUser, id: Uuid) -> AppResult<Product> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if product.owner_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    Ok(product)
}
