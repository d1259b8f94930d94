//! Checkout and cancellation against PostgreSQL.

use domain_cart::{AddToCart, CartService, PgCartRepository};
use domain_orders::*;
use entity::{CouponType, OrderStatus, PaymentStatus, carts, coupons, product_variants, products};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use test_utils::{TestDataBuilder, TestDatabase, fixtures};
use uuid::Uuid;

async fn add(
    db: &TestDatabase,
    user_id: Uuid,
    product_id: Uuid,
    variant_id: Option<Uuid>,
    quantity: i32,
) {
    CartService::new(PgCartRepository::new(db.connection()))
        .add_item(
            user_id,
            AddToCart {
                product_id,
                variant_id,
                quantity,
            },
        )
        .await
        .unwrap();
}

fn checkout(address_id: Uuid, coupon_code: Option<String>) -> Checkout {
    Checkout {
        address_id,
        note: Some("  ".to_string()),
        coupon_code,
        payment_method: None,
    }
}

async fn stock_of(db: &TestDatabase, product_id: Uuid) -> i32 {
    products::Entity::find_by_id(product_id)
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap()
        .stock
}

#[tokio::test]
async fn test_checkout_places_order() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("orders_checkout_ok");
    let user = fixtures::user(&db.connection, &builder, "buyer").await;
    let address = fixtures::address(&db.connection, user.id, true).await;
    let category = fixtures::category(&db.connection, &builder, "desk").await;
    let lamp = fixtures::product(&db.connection, &builder, category.id, "lamp", "40.00", 5).await;
    let chair = fixtures::product(&db.connection, &builder, category.id, "chair", "100.00", 3).await;
    let oak = fixtures::variant(&db.connection, &builder, chair.id, "oak", "120.00", 2).await;
    let coupon = fixtures::coupon(
        &db.connection,
        &builder,
        "ten",
        fixtures::CouponSpec {
            max_discount: Some("15.00"),
            ..Default::default()
        },
    )
    .await;

    add(&db, user.id, lamp.id, None, 2).await;
    add(&db, user.id, chair.id, Some(oak.id), 1).await;

    let service = OrderService::new(PgOrderRepository::new(db.connection()), "EUR");
    let order = service
        .checkout(user.id, checkout(address.id, Some(coupon.code.to_lowercase())))
        .await
        .unwrap();

    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.sub_total, fixtures::money("200.00"));
    assert_eq!(order.discount_amount, fixtures::money("15.00"));
    assert_eq!(order.total_amount, fixtures::money("185.00"));
    assert_eq!(order.coupon_code.as_deref(), Some(coupon.code.as_str()));
    assert_eq!(order.note, None);
    assert!(order.shipping_address.contains("1 Main St"));
    assert_eq!(order.user_email.as_deref(), Some(user.email.as_str()));

    let payment = order.payment.clone().unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.amount, order.total_amount);
    assert_eq!(payment.currency, "EUR");
    assert_eq!(payment.payment_method, "cash_on_delivery");

    assert_eq!(stock_of(&db, lamp.id).await, 3);
    assert_eq!(stock_of(&db, chair.id).await, 3);
    let variant = product_variants::Entity::find_by_id(oak.id)
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(variant.stock, 1);

    let used = coupons::Entity::find_by_id(coupon.id)
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(used.used_count, 1);

    let cart = carts::Entity::find()
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert!(cart.is_checked_out);

    let err = service
        .checkout(user.id, checkout(address.id, None))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::CartEmpty));
}

#[tokio::test]
async fn test_insufficient_stock_rolls_back() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("orders_checkout_stock");
    let user = fixtures::user(&db.connection, &builder, "buyer").await;
    let address = fixtures::address(&db.connection, user.id, true).await;
    let category = fixtures::category(&db.connection, &builder, "desk").await;
    let plenty = fixtures::product(&db.connection, &builder, category.id, "plenty", "5.00", 10).await;
    let scarce = fixtures::product(&db.connection, &builder, category.id, "scarce", "5.00", 3).await;
    let coupon = fixtures::coupon(&db.connection, &builder, "ten", Default::default()).await;

    add(&db, user.id, plenty.id, None, 4).await;
    add(&db, user.id, scarce.id, None, 3).await;

    // Another buyer took the stock after it went into the cart.
    let mut row: products::ActiveModel = scarce.clone().into();
    row.stock = Set(1);
    row.update(&db.connection).await.unwrap();

    let service = OrderService::new(PgOrderRepository::new(db.connection()), "USD");
    let err = service
        .checkout(user.id, checkout(address.id, Some(coupon.code.clone())))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InsufficientStock { available: 1, requested: 3, .. }));

    assert_eq!(stock_of(&db, plenty.id).await, 10);
    assert_eq!(stock_of(&db, scarce.id).await, 1);
    let untouched = coupons::Entity::find_by_id(coupon.id)
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.used_count, 0);
    let cart = carts::Entity::find()
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert!(!cart.is_checked_out);
}

#[tokio::test]
async fn test_checkout_rejections() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("orders_checkout_reject");
    let user = fixtures::user(&db.connection, &builder, "buyer").await;
    let stranger = fixtures::user(&db.connection, &builder, "stranger").await;
    let foreign = fixtures::address(&db.connection, stranger.id, true).await;
    let address = fixtures::address(&db.connection, user.id, true).await;
    let category = fixtures::category(&db.connection, &builder, "desk").await;
    let product = fixtures::product(&db.connection, &builder, category.id, "pen", "20.00", 10).await;
    let service = OrderService::new(PgOrderRepository::new(db.connection()), "USD");

    let err = service
        .checkout(user.id, checkout(address.id, None))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cart is empty");

    add(&db, user.id, product.id, None, 1).await;

    let err = service
        .checkout(user.id, checkout(foreign.id, None))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::AddressNotFound));

    let picky = fixtures::coupon(
        &db.connection,
        &builder,
        "picky",
        fixtures::CouponSpec {
            coupon_type: CouponType::Fixed,
            value: "5",
            min_amount: Some("50.00"),
            ..Default::default()
        },
    )
    .await;
    let err = service
        .checkout(user.id, checkout(address.id, Some(picky.code)))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Minimum order amount 50.00 required");

    let err = service
        .checkout(user.id, checkout(address.id, Some("NOPE-NOPE".into())))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Coupon(_)));
    assert_eq!(stock_of(&db, product.id).await, 10);
}

#[tokio::test]
async fn test_cancel_restores_everything() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("orders_cancel");
    let user = fixtures::user(&db.connection, &builder, "buyer").await;
    let other = fixtures::user(&db.connection, &builder, "other").await;
    let address = fixtures::address(&db.connection, user.id, true).await;
    let category = fixtures::category(&db.connection, &builder, "desk").await;
    let product = fixtures::product(&db.connection, &builder, category.id, "pen", "20.00", 10).await;
    let coupon = fixtures::coupon(&db.connection, &builder, "ten", Default::default()).await;
    add(&db, user.id, product.id, None, 4).await;

    let service = OrderService::new(PgOrderRepository::new(db.connection()), "USD");
    let order = service
        .checkout(user.id, checkout(address.id, Some(coupon.code.clone())))
        .await
        .unwrap();
    assert_eq!(stock_of(&db, product.id).await, 6);

    let err = service.cancel_order(other.id, order.id).await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));

    let cancelled = service.cancel_order(user.id, order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.payment.unwrap().status, PaymentStatus::Failed);
    assert_eq!(stock_of(&db, product.id).await, 10);
    let released = coupons::Entity::find_by_id(coupon.id)
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(released.used_count, 0);

    let err = service.cancel_order(user.id, order.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Only pending orders can be cancelled");

    let err = service
        .update_status(
            order.id,
            UpdateOrderStatus {
                status: OrderStatus::Shipped,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot change status of a cancelled order");
}

#[tokio::test]
async fn test_set_status_freezes_final_orders() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("orders_set_status");
    let user = fixtures::user(&db.connection, &builder, "buyer").await;
    let address = fixtures::address(&db.connection, user.id, true).await;
    let category = fixtures::category(&db.connection, &builder, "desk").await;
    let product = fixtures::product(&db.connection, &builder, category.id, "pen", "5.00", 10).await;
    let repository = PgOrderRepository::new(db.connection());
    let service = OrderService::new(PgOrderRepository::new(db.connection()), "USD");

    add(&db, user.id, product.id, None, 1).await;
    let cancelled = service.checkout(user.id, checkout(address.id, None)).await.unwrap();
    service.cancel_order(user.id, cancelled.id).await.unwrap();

    let err = repository
        .set_status(cancelled.id, OrderStatus::Processing)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::FinalStatus(OrderStatus::Cancelled)));
    let stored = repository.find(cancelled.id, None).await.unwrap().unwrap();
    assert_eq!(stored.order.status, OrderStatus::Cancelled);

    add(&db, user.id, product.id, None, 1).await;
    let delivered = service.checkout(user.id, checkout(address.id, None)).await.unwrap();
    let shipped = repository
        .set_status(delivered.id, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.order.status, OrderStatus::Shipped);
    repository
        .set_status(delivered.id, OrderStatus::Delivered)
        .await
        .unwrap();

    let err = repository
        .set_status(delivered.id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::FinalStatus(OrderStatus::Delivered)));

    let err = repository
        .set_status(Uuid::new_v4(), OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn test_list_pagination_and_search() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("orders_list");
    let user = fixtures::user(&db.connection, &builder, "buyer").await;
    let other = fixtures::user(&db.connection, &builder, "other").await;
    let address = fixtures::address(&db.connection, user.id, true).await;
    let other_address = fixtures::address(&db.connection, other.id, true).await;
    let category = fixtures::category(&db.connection, &builder, "desk").await;
    let product = fixtures::product(&db.connection, &builder, category.id, "pen", "1.00", 100).await;
    let service = OrderService::new(PgOrderRepository::new(db.connection()), "USD");

    let mut numbers = Vec::new();
    for _ in 0..3 {
        add(&db, user.id, product.id, None, 1).await;
        let order = service
            .checkout(user.id, checkout(address.id, None))
            .await
            .unwrap();
        numbers.push(order.order_number);
    }
    add(&db, other.id, product.id, None, 1).await;
    service
        .checkout(other.id, checkout(other_address.id, None))
        .await
        .unwrap();

    let page = service
        .list_my_orders(
            user.id,
            OrderQuery {
                page: 1,
                limit: 2,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].order_number, numbers[2]);

    let second = service
        .list_my_orders(
            user.id,
            OrderQuery {
                page: 2,
                limit: 2,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(second.data.len(), 1);
    assert_eq!(second.data[0].order_number, numbers[0]);

    let suffix = numbers[1][13..].to_lowercase();
    let found = service
        .list_my_orders(
            user.id,
            OrderQuery {
                search: Some(suffix),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.data[0].order_number, numbers[1]);

    let wildcard = service
        .list_my_orders(
            user.id,
            OrderQuery {
                search: Some("_".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(wildcard.total, 0);

    let err = service
        .list_my_orders(
            user.id,
            OrderQuery {
                page: u64::MAX,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));

    let everything = service.list_all_orders(OrderQuery::default()).await.unwrap();
    assert_eq!(everything.total, 4);
}
