//! Direct row inserts for integration tests.
//!
//! These bypass the services so a test can set up exactly the state it
//! needs (an inactive product, an exhausted coupon) in one line.

use chrono::{DateTime, Utc};
use entity::{CouponType, Role, addresses, categories, coupons, product_variants, products, users};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::str::FromStr;
use uuid::Uuid;

use crate::TestDataBuilder;

const PLACEHOLDER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGVzdHNhbHQ$dGVzdGhhc2g";

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

/// Parse a decimal literal, panicking on typos in test code.
pub fn money(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|_| panic!("invalid decimal literal {value}"))
}

pub async fn user(db: &DatabaseConnection, builder: &TestDataBuilder, suffix: &str) -> users::Model {
    user_with_role(db, builder, suffix, Role::Customer).await
}

pub async fn user_with_role(
    db: &DatabaseConnection,
    builder: &TestDataBuilder,
    suffix: &str,
    role: Role,
) -> users::Model {
    users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(builder.email(suffix)),
        password_hash: Set(PLACEHOLDER_HASH.to_string()),
        first_name: Set("Test".to_string()),
        last_name: Set(suffix.to_string()),
        phone: Set(None),
        role: Set(role),
        is_active: Set(true),
        refresh_token_hash: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

pub async fn category(
    db: &DatabaseConnection,
    builder: &TestDataBuilder,
    suffix: &str,
) -> categories::Model {
    categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(builder.name("category", suffix)),
        slug: Set(builder.slug("category", suffix)),
        description: Set(None),
        image_url: Set(None),
        parent_id: Set(None),
        is_active: Set(true),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert category")
}

pub async fn product(
    db: &DatabaseConnection,
    builder: &TestDataBuilder,
    category_id: Uuid,
    suffix: &str,
    price: &str,
    stock: i32,
) -> products::Model {
    products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(builder.name("product", suffix)),
        slug: Set(builder.slug("product", suffix)),
        description: Set(None),
        price: Set(money(price)),
        compare_price: Set(None),
        sku: Set(builder.sku(suffix)),
        stock: Set(stock),
        weight: Set(None),
        brand: Set(None),
        category_id: Set(category_id),
        is_active: Set(true),
        expiry_date: Set(None),
        warranty_months: Set(None),
        dimensions: Set(None),
        attributes: Set(None),
        tags: Set(serde_json::json!([])),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert product")
}

pub async fn variant(
    db: &DatabaseConnection,
    builder: &TestDataBuilder,
    product_id: Uuid,
    suffix: &str,
    price: &str,
    stock: i32,
) -> product_variants::Model {
    product_variants::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        name: Set(suffix.to_string()),
        sku: Set(builder.sku(&format!("v-{suffix}"))),
        price: Set(money(price)),
        stock: Set(stock),
        attributes: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert variant")
}

pub async fn address(db: &DatabaseConnection, user_id: Uuid, is_default: bool) -> addresses::Model {
    addresses::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        label: Set(Some("Home".to_string())),
        full_name: Set("Test Buyer".to_string()),
        phone: Set("+1 555 0100".to_string()),
        street: Set("1 Main St".to_string()),
        apartment: Set(None),
        city: Set("Springfield".to_string()),
        state: Set(Some("IL".to_string())),
        postal_code: Set("62701".to_string()),
        country: Set("US".to_string()),
        is_default: Set(is_default),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert address")
}

/// Knobs for [`coupon`]; defaults to an active, unlimited 10% coupon.
pub struct CouponSpec {
    pub coupon_type: CouponType,
    pub value: &'static str,
    pub min_amount: Option<&'static str>,
    pub max_discount: Option<&'static str>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Default for CouponSpec {
    fn default() -> Self {
        Self {
            coupon_type: CouponType::Percentage,
            value: "10",
            min_amount: None,
            max_discount: None,
            usage_limit: None,
            used_count: 0,
            expires_at: None,
            is_active: true,
        }
    }
}

pub async fn coupon(
    db: &DatabaseConnection,
    builder: &TestDataBuilder,
    suffix: &str,
    spec: CouponSpec,
) -> coupons::Model {
    coupons::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(builder.coupon_code(suffix)),
        coupon_type: Set(spec.coupon_type),
        value: Set(money(spec.value)),
        min_amount: Set(spec.min_amount.map(money)),
        max_discount: Set(spec.max_discount.map(money)),
        usage_limit: Set(spec.usage_limit),
        used_count: Set(spec.used_count),
        expires_at: Set(spec.expires_at.map(Into::into)),
        is_active: Set(spec.is_active),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert coupon")
}
