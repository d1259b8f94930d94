use async_trait::async_trait;
use entity::{categories, products};
use uuid::Uuid;

use crate::error::CategoryResult;
use crate::models::{NewCategory, UpdateCategory};

/// Repository trait for category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, input: NewCategory) -> CategoryResult<categories::Model>;

    async fn find_by_id(&self, id: Uuid) -> CategoryResult<Option<categories::Model>>;

    /// Whether `slug` is used by a category other than `exclude`
    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> CategoryResult<bool>;

    /// Active categories ordered by name
    async fn list_active(&self) -> CategoryResult<Vec<categories::Model>>;

    /// Active direct children of a category, ordered by name
    async fn children(&self, parent_id: Uuid) -> CategoryResult<Vec<categories::Model>>;

    /// Active products in a category, newest first
    async fn active_products(&self, category_id: Uuid) -> CategoryResult<Vec<products::Model>>;

    /// Apply a partial update; `input.slug` is already resolved
    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<categories::Model>;

    /// Delete a category, returns false when absent
    async fn delete(&self, id: Uuid) -> CategoryResult<bool>;
}
