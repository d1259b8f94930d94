use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Cart not found")]
    CartNotFound,

    #[error("Item not found in cart: {0}")]
    ItemNotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Invalid variant for this product")]
    InvalidVariant,

    #[error("Insufficient stock. Only {available} available")]
    InsufficientStock { available: i32 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CartResult<T> = Result<T, CartError>;

impl From<sea_orm::DbErr> for CartError {
    fn from(err: sea_orm::DbErr) -> Self {
        CartError::Internal(format!("Database error: {}", err))
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::CartNotFound => AppError::NotFound("Cart not found".to_string()),
            CartError::ItemNotFound(_) => AppError::NotFound("Item not found in cart".to_string()),
            CartError::ProductNotFound(_) => AppError::NotFound("Product not found".to_string()),
            err @ (CartError::InvalidVariant | CartError::InsufficientStock { .. }) => {
                AppError::BadRequest(err.to_string())
            }
            CartError::Validation(msg) => AppError::BadRequest(msg),
            CartError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
