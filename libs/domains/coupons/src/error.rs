use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CouponError {
    #[error("Coupon not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid coupon code")]
    InvalidCode,

    #[error("Coupon has expired")]
    Expired,

    #[error("Coupon usage limit reached")]
    UsageLimitReached,

    #[error("Minimum order amount {0} required")]
    MinimumNotMet(Decimal),

    #[error("Coupon code '{0}' already exists")]
    DuplicateCode(String),

    #[error("Percentage coupons cannot exceed 100")]
    PercentageTooHigh,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CouponResult<T> = Result<T, CouponError>;

impl From<sea_orm::DbErr> for CouponError {
    fn from(err: sea_orm::DbErr) -> Self {
        CouponError::Internal(format!("Database error: {}", err))
    }
}

impl From<CouponError> for AppError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::NotFound(_) => AppError::NotFound("Coupon not found".to_string()),
            CouponError::DuplicateCode(_) => AppError::Conflict(err.to_string()),
            CouponError::Validation(msg) => AppError::BadRequest(msg),
            CouponError::Internal(msg) => AppError::InternalServerError(msg),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for CouponError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
