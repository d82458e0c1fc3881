use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{
    db::DbPool,
    dto::cart::{CartItemsRequest, CartResponse},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
};

pub fn router() -> Router<DbPool> {
    Router::new().route(
        "/cart",
        get(get_cart)
            .post(replace_cart)
            .put(replace_cart)
            .patch(add_to_cart)
            .delete(delete_cart),
    )
}

#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Caller's cart", body = ApiResponse<CartResponse>),
        (status = 404, description = "No cart yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartResponse>>> {
    let resp = cart_service::get_cart(&pool, &user).await?;
    Ok(Json(resp))
}

// POST and PUT share the handler: both upsert and fully replace the item set.
#[utoipa::path(
    put,
    path = "/cart",
    request_body = CartItemsRequest,
    responses(
        (status = 200, description = "Cart upserted, item set replaced", body = ApiResponse<CartResponse>),
        (status = 400, description = "Unknown product references"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn replace_cart(
    State(pool): State<DbPool>,
    user: AuthUser,
    AppJson(payload): AppJson<CartItemsRequest>,
) -> AppResult<Json<ApiResponse<CartResponse>>> {
    let resp = cart_service::replace_items(&pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/cart",
    request_body = CartItemsRequest,
    responses(
        (status = 200, description = "Cart upserted, items added to set", body = ApiResponse<CartResponse>),
        (status = 400, description = "Unknown product references"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(pool): State<DbPool>,
    user: AuthUser,
    AppJson(payload): AppJson<CartItemsRequest>,
) -> AppResult<Json<ApiResponse<CartResponse>>> {
    let resp = cart_service::add_items(&pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/cart",
    responses(
        (status = 204, description = "Cart deleted"),
        (status = 404, description = "No cart yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn delete_cart(State(pool): State<DbPool>, user: AuthUser) -> AppResult<StatusCode> {
    cart_service::delete_cart(&pool, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
