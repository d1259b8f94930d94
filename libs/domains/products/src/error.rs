use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Variant {variant_id} not found for product {product_id}")]
    VariantNotFound { product_id: Uuid, variant_id: Uuid },

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("A product or variant with this {0} already exists")]
    Duplicate(&'static str),

    #[error("Product is referenced by orders")]
    InUse,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<sea_orm::DbErr> for ProductError {
    fn from(err: sea_orm::DbErr) -> Self {
        ProductError::Internal(format!("Database error: {}", err))
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::NotFound("Product not found".to_string()),
            ProductError::VariantNotFound { .. } => {
                AppError::NotFound("Variant not found".to_string())
            }
            ProductError::CategoryNotFound(_) => {
                AppError::NotFound("Category not found".to_string())
            }
            ProductError::Duplicate(field) => {
                AppError::Conflict(format!("A product or variant with this {} already exists", field))
            }
            ProductError::InUse => AppError::Conflict(
                "Product is referenced by orders; deactivate it instead".to_string(),
            ),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
