use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
        cart::{CartItemsRequest, CartResponse},
        orders::{CreateOrderRequest, OrderList, OrderResponse},
        products::{CreateProductRequest, ProductList, ProductResponse, UpdateProductRequest},
    },
    error::FieldError,
    models::OrderStatus,
    response::ApiResponse,
    routes::{auth, cart, health, health::HealthData, orders, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        products::list_products,
        products::create_product,
        products::get_product,
        products::replace_product,
        products::update_product,
        products::delete_product,
        cart::get_cart,
        cart::replace_cart,
        cart::add_to_cart,
        cart::delete_cart,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::delete_order,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserResponse,
            CreateProductRequest,
            UpdateProductRequest,
            ProductResponse,
            ProductList,
            CartItemsRequest,
            CartResponse,
            CreateOrderRequest,
            OrderResponse,
            OrderList,
            OrderStatus,
            FieldError,
            HealthData,
            ApiResponse<HealthData>,
            ApiResponse<UserResponse>,
            ApiResponse<LoginResponse>,
            ApiResponse<ProductResponse>,
            ApiResponse<ProductList>,
            ApiResponse<CartResponse>,
            ApiResponse<OrderResponse>,
            ApiResponse<OrderList>,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_body_schemas_are_registered() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        for name in ["HealthData", "UserResponse", "LoginResponse"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
        for inner in ["HealthData", "UserResponse", "LoginResponse"] {
            assert!(
                schemas.keys().any(|k| k.contains("ApiResponse") && k.contains(inner)),
                "missing ApiResponse schema for {inner}"
            );
        }
    }
}
