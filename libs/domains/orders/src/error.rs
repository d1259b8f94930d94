use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_coupons::CouponError;
use entity::OrderStatus;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order with ID {0} not found")]
    NotFound(Uuid),

    #[error("Cart is empty")]
    CartEmpty,

    #[error("Address not found")]
    AddressNotFound,

    #[error("Product {0} is no longer available")]
    ProductUnavailable(String),

    #[error("Insufficient stock for {name}. Available: {available}, requested: {requested}")]
    InsufficientStock {
        name: String,
        available: i32,
        requested: i32,
    },

    #[error("Only pending orders can be cancelled")]
    NotCancellable,

    #[error("Cannot change status of a {0} order")]
    FinalStatus(OrderStatus),

    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<sea_orm::DbErr> for OrderError {
    fn from(err: sea_orm::DbErr) -> Self {
        OrderError::Internal(format!("Database error: {}", err))
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) | OrderError::AddressNotFound => {
                AppError::NotFound(err.to_string())
            }
            OrderError::Coupon(err) => err.into(),
            OrderError::Validation(msg) => AppError::BadRequest(msg),
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_messages() {
        let id = Uuid::nil();
        assert_eq!(
            OrderError::NotFound(id).to_string(),
            format!("Order with ID {} not found", id)
        );
        assert_eq!(
            OrderError::InsufficientStock {
                name: "Mug".into(),
                available: 1,
                requested: 3
            }
            .to_string(),
            "Insufficient stock for Mug. Available: 1, requested: 3"
        );
        assert_eq!(
            OrderError::FinalStatus(OrderStatus::Delivered).to_string(),
            "Cannot change status of a delivered order"
        );
    }

    #[test]
    fn test_coupon_errors_keep_their_status() {
        let err = AppError::from(OrderError::from(CouponError::Expired));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Bad Request: Coupon has expired");
    }

    #[test]
    fn test_address_not_found_is_404() {
        assert_eq!(
            AppError::from(OrderError::AddressNotFound).status(),
            StatusCode::NOT_FOUND
        );
    }
}
