//! Coupons against PostgreSQL.

use chrono::{Duration, Utc};
use domain_coupons::*;
use entity::CouponType;
use test_utils::fixtures::{self, CouponSpec};
use test_utils::{TestDataBuilder, TestDatabase};
use uuid::Uuid;

fn service(db: &TestDatabase) -> CouponService<PgCouponRepository> {
    CouponService::new(PgCouponRepository::new(db.connection()))
}

#[tokio::test]
async fn test_create_then_validate_lowercase_code() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("coupons_create_validate");
    let code = builder.coupon_code("welcome").to_lowercase();
    let service = service(&db);

    let created = service
        .create_coupon(CreateCoupon {
            code: code.clone(),
            coupon_type: CouponType::Percentage,
            value: fixtures::money("10"),
            min_amount: Some(fixtures::money("20.00")),
            max_discount: Some(fixtures::money("15.00")),
            usage_limit: Some(5),
            expires_at: Some(Utc::now() + Duration::days(7)),
            is_active: None,
        })
        .await
        .unwrap();
    assert_eq!(created.code, code.to_uppercase());
    assert!(created.is_active);

    let validation = service
        .validate_coupon(&code, fixtures::money("300.00"))
        .await
        .unwrap();
    assert_eq!(validation.coupon, created);
    assert_eq!(validation.discount, fixtures::money("15.00"));

    let err = service
        .validate_coupon(&code, fixtures::money("19.99"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Minimum order amount 20.00 required");
}

#[tokio::test]
async fn test_exhausted_coupon() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("coupons_exhausted");
    let coupon = fixtures::coupon(
        &db.connection,
        &builder,
        "used",
        CouponSpec {
            usage_limit: Some(2),
            used_count: 2,
            ..Default::default()
        },
    )
    .await;

    let err = service(&db)
        .validate_coupon(&coupon.code, fixtures::money("50"))
        .await
        .unwrap_err();
    assert!(matches!(err, CouponError::UsageLimitReached));
}

#[tokio::test]
async fn test_duplicate_code_conflicts() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("coupons_duplicate");
    let existing = fixtures::coupon(&db.connection, &builder, "dup", CouponSpec::default()).await;

    let err = service(&db)
        .create_coupon(CreateCoupon {
            code: existing.code.to_lowercase(),
            coupon_type: CouponType::Fixed,
            value: fixtures::money("5"),
            min_amount: None,
            max_discount: None,
            usage_limit: None,
            expires_at: None,
            is_active: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CouponError::DuplicateCode(_)));
}

#[tokio::test]
async fn test_delete_twice() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("coupons_delete_twice");
    let coupon = fixtures::coupon(&db.connection, &builder, "gone", CouponSpec::default()).await;
    let service = service(&db);

    assert_eq!(
        service.delete_coupon(coupon.id).await.unwrap().message,
        "Coupon deleted"
    );
    assert!(matches!(
        service.delete_coupon(coupon.id).await,
        Err(CouponError::NotFound(id)) if id == coupon.id
    ));
    assert!(matches!(
        service.delete_coupon(Uuid::new_v4()).await,
        Err(CouponError::NotFound(_))
    ));
}
