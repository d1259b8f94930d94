use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WishlistError {
    #[error("Wishlist item not found")]
    ItemNotFound,

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WishlistResult<T> = Result<T, WishlistError>;

impl From<sea_orm::DbErr> for WishlistError {
    fn from(err: sea_orm::DbErr) -> Self {
        WishlistError::Internal(format!("Database error: {}", err))
    }
}

impl From<WishlistError> for AppError {
    fn from(err: WishlistError) -> Self {
        match err {
            WishlistError::ItemNotFound => AppError::NotFound(err.to_string()),
            WishlistError::ProductNotFound(_) => {
                AppError::NotFound("Product not found".to_string())
            }
            WishlistError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for WishlistError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
