use async_trait::async_trait;
use entity::reviews;
use uuid::Uuid;

use crate::error::ReviewResult;
use crate::models::{NewReview, ReviewQuery, ReviewRecord, UpdateReview};

/// Repository trait for reviews
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn product_exists(&self, product_id: Uuid) -> ReviewResult<bool>;

    async fn find_by_user_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> ReviewResult<Option<reviews::Model>>;

    /// Whether the user has a delivered order containing the product
    async fn has_delivered(&self, user_id: Uuid, product_id: Uuid) -> ReviewResult<bool>;

    async fn create(&self, review: NewReview) -> ReviewResult<ReviewRecord>;

    /// Newest first
    async fn list(&self, query: ReviewQuery) -> ReviewResult<Vec<ReviewRecord>>;

    async fn find(&self, id: Uuid) -> ReviewResult<Option<ReviewRecord>>;

    /// Update the user's own review, `None` when absent or not theirs
    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: UpdateReview,
    ) -> ReviewResult<Option<ReviewRecord>>;

    /// Delete the user's own review, returns false when absent or not theirs
    async fn delete(&self, id: Uuid, user_id: Uuid) -> ReviewResult<bool>;
}
