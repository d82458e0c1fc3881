use axum_shop_api::{
    db::{DbPool, create_pool},
    dto::{
        cart::CartItemsRequest,
        orders::CreateOrderRequest,
        products::{CreateProductRequest, UpdateProductRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::OrderStatus,
    services::{cart_service, order_service, product_service},
};
use uuid::Uuid;

// Integration tests against a real database. Each test seeds its own users
// and products with unique names, so they can run in parallel.
//
// Skipped when neither TEST_DATABASE_URL nor DATABASE_URL is set.

async fn setup_pool() -> anyhow::Result<Option<DbPool>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(Some(pool))
}

async fn create_user(pool: &DbPool, is_staff: bool) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, is_staff) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(format!("user-{id}"))
    .bind(format!("user-{id}@example.com"))
    .bind("dummy")
    .bind(is_staff)
    .execute(pool)
    .await?;

    Ok(AuthUser {
        user_id: id,
        is_staff,
    })
}

async fn create_product(pool: &DbPool, owner: &AuthUser) -> anyhow::Result<Uuid> {
    let resp = product_service::create_product(
        pool,
        owner,
        CreateProductRequest {
            name: format!("Widget {}", Uuid::new_v4()),
            description: "A product for testing".into(),
            image_url: "https://example.com/widget.png".into(),
            price: 9.99,
            stock: 5,
            owner: None,
        },
    )
    .await?;
    Ok(resp.data.unwrap().id)
}

#[tokio::test]
async fn cart_upsert_replace_and_merge_semantics() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let user = create_user(&pool, false).await?;
    let a = create_product(&pool, &user).await?;
    let b = create_product(&pool, &user).await?;
    let c = create_product(&pool, &user).await?;

    // No cart yet: GET and DELETE are 404.
    assert!(matches!(
        cart_service::get_cart(&pool, &user).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        cart_service::delete_cart(&pool, &user).await,
        Err(AppError::NotFound)
    ));

    // First write creates the cart and sets {a, b}.
    let resp = cart_service::replace_items(&pool, &user, CartItemsRequest { items: vec![a, b] })
        .await?;
    let mut items = resp.data.unwrap().items;
    items.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(items, expected);

    // PATCH is additive: {a, b} + {c} = {a, b, c}.
    let resp = cart_service::add_items(&pool, &user, CartItemsRequest { items: vec![c] }).await?;
    assert_eq!(resp.data.unwrap().items.len(), 3);

    // PUT replaces the whole set.
    let resp =
        cart_service::replace_items(&pool, &user, CartItemsRequest { items: vec![c] }).await?;
    assert_eq!(resp.data.unwrap().items, vec![c]);

    // Repeated writes never create a second cart for the same owner.
    cart_service::replace_items(&pool, &user, CartItemsRequest { items: vec![a] }).await?;
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM carts WHERE owner_id = $1")
        .bind(user.user_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 1);

    // Duplicate ids collapse to a set.
    let resp =
        cart_service::replace_items(&pool, &user, CartItemsRequest { items: vec![a, a, a] })
            .await?;
    assert_eq!(resp.data.unwrap().items, vec![a]);

    // Unknown product references are a validation failure.
    let err = cart_service::replace_items(
        &pool,
        &user,
        CartItemsRequest {
            items: vec![Uuid::new_v4()],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    cart_service::delete_cart(&pool, &user).await?;
    assert!(matches!(
        cart_service::get_cart(&pool, &user).await,
        Err(AppError::NotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn orders_force_pending_and_hide_existence() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let owner = create_user(&pool, false).await?;
    let stranger = create_user(&pool, false).await?;
    let product = create_product(&pool, &owner).await?;

    // Client-supplied status is discarded; orders always start PENDING.
    let resp = order_service::create_order(
        &pool,
        &owner,
        CreateOrderRequest {
            items: vec![product],
            status: Some("CONFIRMED".into()),
        },
    )
    .await?;
    let order = resp.data.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.owner, owner.user_id);
    assert_eq!(order.items, vec![product]);

    // The owner sees it; a stranger gets a 404, not a 403.
    order_service::get_order(&pool, &owner, order.id).await?;
    assert!(matches!(
        order_service::get_order(&pool, &stranger, order.id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        order_service::delete_order(&pool, &stranger, order.id).await,
        Err(AppError::NotFound)
    ));

    // Listing is scoped to the caller.
    let listed = order_service::list_orders(&pool, &stranger).await?;
    assert!(listed.data.unwrap().items.iter().all(|o| o.id != order.id));
    let listed = order_service::list_orders(&pool, &owner).await?;
    assert!(listed.data.unwrap().items.iter().any(|o| o.id == order.id));

    // Unknown product references fail validation.
    let err = order_service::create_order(
        &pool,
        &owner,
        CreateOrderRequest {
            items: vec![Uuid::new_v4()],
            status: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    order_service::delete_order(&pool, &owner, order.id).await?;
    assert!(matches!(
        order_service::get_order(&pool, &owner, order.id).await,
        Err(AppError::NotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn staff_owned_orders_are_visible_to_other_callers() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    // The gate checks the order owner's staff flag, so an order owned by a
    // staff user is readable by any authenticated caller.
    let staff = create_user(&pool, true).await?;
    let other = create_user(&pool, false).await?;
    let product = create_product(&pool, &staff).await?;

    let resp = order_service::create_order(
        &pool,
        &staff,
        CreateOrderRequest {
            items: vec![product],
            status: None,
        },
    )
    .await?;
    let order = resp.data.unwrap();

    let seen = order_service::get_order(&pool, &other, order.id).await?;
    assert_eq!(seen.data.unwrap().id, order.id);

    // The reverse does not hold: a staff caller gets no special access to
    // orders owned by non-staff users.
    let resp = order_service::create_order(
        &pool,
        &other,
        CreateOrderRequest {
            items: vec![product],
            status: None,
        },
    )
    .await?;
    let others_order = resp.data.unwrap();
    assert!(matches!(
        order_service::get_order(&pool, &staff, others_order.id).await,
        Err(AppError::NotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn product_mutation_is_owner_only_and_owner_is_immutable() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let owner = create_user(&pool, false).await?;
    let stranger = create_user(&pool, false).await?;
    let product = create_product(&pool, &owner).await?;

    // Anyone can read.
    product_service::get_product(&pool, product).await?;

    // Only the owner can mutate; others get a 403.
    let err = product_service::update_product(
        &pool,
        &stranger,
        product,
        UpdateProductRequest {
            name: Some("Hijacked".into()),
            description: None,
            image_url: None,
            price: None,
            stock: None,
            owner: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    assert!(matches!(
        product_service::delete_product(&pool, &stranger, product)
            .await
            .unwrap_err(),
        AppError::Forbidden
    ));

    // A client-supplied owner field never transfers ownership.
    product_service::update_product(
        &pool,
        &owner,
        product,
        UpdateProductRequest {
            name: None,
            description: None,
            image_url: None,
            price: Some(19.99),
            stock: None,
            owner: Some(stranger.user_id),
        },
    )
    .await?;
    let (owner_id,): (Uuid,) = sqlx::query_as("SELECT owner_id FROM products WHERE id = $1")
        .bind(product)
        .fetch_one(&pool)
        .await?;
    assert_eq!(owner_id, owner.user_id);

    // Mutating a missing product is a 404 before any ownership check.
    assert!(matches!(
        product_service::delete_product(&pool, &owner, Uuid::new_v4())
            .await
            .unwrap_err(),
        AppError::NotFound
    ));

    product_service::delete_product(&pool, &owner, product).await?;
    assert!(matches!(
        product_service::get_product(&pool, product).await,
        Err(AppError::NotFound)
    ));

    Ok(())
}
