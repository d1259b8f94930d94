use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    #[error("Parent category not found: {0}")]
    ParentNotFound(Uuid),

    #[error("Category with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("A category cannot be its own parent")]
    SelfParent,

    #[error("Category still has products")]
    HasProducts,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<sea_orm::DbErr> for CategoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        CategoryError::Internal(format!("Database error: {}", err))
    }
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => AppError::NotFound("Category not found".to_string()),
            CategoryError::ParentNotFound(_) => {
                AppError::NotFound("Parent category not found".to_string())
            }
            CategoryError::DuplicateSlug(slug) => {
                AppError::Conflict(format!("Category with slug '{}' already exists", slug))
            }
            CategoryError::SelfParent => {
                AppError::BadRequest("A category cannot be its own parent".to_string())
            }
            CategoryError::HasProducts => AppError::Conflict(
                "Category still has products; move or delete them first".to_string(),
            ),
            CategoryError::Validation(msg) => AppError::BadRequest(msg),
            CategoryError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
