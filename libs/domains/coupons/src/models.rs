use axum_helpers::validation::{non_negative, positive};
use chrono::{DateTime, Utc};
use entity::{CouponType, coupons};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub id: Uuid,
    #[schema(example = "SUMMER10")]
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    #[schema(example = "10")]
    pub value: Decimal,
    pub min_amount: Option<Decimal>,
    pub max_discount: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<coupons::Model> for Coupon {
    fn from(model: coupons::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            coupon_type: model.coupon_type,
            value: model.value,
            min_amount: model.min_amount,
            max_discount: model.max_discount,
            usage_limit: model.usage_limit,
            used_count: model.used_count,
            expires_at: model.expires_at.map(|t| t.with_timezone(&Utc)),
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCoupon {
    /// Stored uppercase
    #[validate(length(min = 3, max = 50))]
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    /// Percentage (at most 100) or fixed amount
    #[validate(custom(function = "positive"))]
    pub value: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub min_amount: Option<Decimal>,
    #[validate(custom(function = "positive"))]
    pub max_discount: Option<Decimal>,
    #[validate(range(min = 1))]
    pub usage_limit: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCoupon {
    #[validate(length(min = 3, max = 50))]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub coupon_type: Option<CouponType>,
    #[validate(custom(function = "positive"))]
    pub value: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub min_amount: Option<Decimal>,
    #[validate(custom(function = "positive"))]
    pub max_discount: Option<Decimal>,
    #[validate(range(min = 1))]
    pub usage_limit: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidateCouponQuery {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    /// Order total the coupon would apply to
    #[validate(custom(function = "non_negative"))]
    #[param(value_type = String, example = "120.00")]
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CouponValidation {
    pub coupon: Coupon,
    #[schema(example = "12.00")]
    pub discount: Decimal,
}

/// Normalize a coupon code for storage and lookup
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
