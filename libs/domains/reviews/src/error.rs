use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(Uuid),

    /// Absent, or written by someone else
    #[error("Review not found or unauthorized")]
    NotOwned,

    #[error("Product not found")]
    ProductNotFound,

    #[error("You have already reviewed this product")]
    AlreadyReviewed,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ReviewResult<T> = Result<T, ReviewError>;

impl From<sea_orm::DbErr> for ReviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        ReviewError::Internal(format!("Database error: {}", err))
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(_) => AppError::NotFound("Review not found".to_string()),
            ReviewError::NotOwned | ReviewError::ProductNotFound => {
                AppError::NotFound(err.to_string())
            }
            ReviewError::AlreadyReviewed => AppError::BadRequest(err.to_string()),
            ReviewError::Validation(msg) => AppError::BadRequest(msg),
            ReviewError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
