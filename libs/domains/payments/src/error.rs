use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment not found: {0}")]
    NotFound(Uuid),

    #[error("Order not found")]
    OrderNotFound,

    #[error("Payment already initiated for this order")]
    AlreadyInitiated,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PaymentResult<T> = Result<T, PaymentError>;

impl From<sea_orm::DbErr> for PaymentError {
    fn from(err: sea_orm::DbErr) -> Self {
        PaymentError::Internal(format!("Database error: {}", err))
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotFound(_) => AppError::NotFound("Payment not found".to_string()),
            PaymentError::OrderNotFound => AppError::NotFound(err.to_string()),
            PaymentError::AlreadyInitiated => AppError::BadRequest(err.to_string()),
            PaymentError::Validation(msg) => AppError::BadRequest(msg),
            PaymentError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (PaymentError::NotFound(Uuid::new_v4()), StatusCode::NOT_FOUND),
            (PaymentError::OrderNotFound, StatusCode::NOT_FOUND),
            (PaymentError::AlreadyInitiated, StatusCode::BAD_REQUEST),
            (PaymentError::Validation("amount".into()), StatusCode::BAD_REQUEST),
            (PaymentError::Internal("db".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }
}
