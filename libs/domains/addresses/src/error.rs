use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("Address not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Another default address was saved concurrently")]
    DefaultConflict,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AddressResult<T> = Result<T, AddressError>;

impl From<sea_orm::DbErr> for AddressError {
    fn from(err: sea_orm::DbErr) -> Self {
        AddressError::Internal(format!("Database error: {}", err))
    }
}

impl From<AddressError> for AppError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::NotFound(_) => AppError::NotFound("Address not found".to_string()),
            AddressError::Validation(msg) => AppError::BadRequest(msg),
            AddressError::DefaultConflict => AppError::Conflict(err.to_string()),
            AddressError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for AddressError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
