use async_trait::async_trait;
use entity::wishlists;
use uuid::Uuid;

use crate::error::WishlistResult;
use crate::models::WishlistRecord;

/// Repository trait for wishlist rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    async fn product_exists(&self, product_id: Uuid) -> WishlistResult<bool>;

    async fn find_by_user_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> WishlistResult<Option<wishlists::Model>>;

    /// The user's wishlist, newest first
    async fn list(&self, user_id: Uuid) -> WishlistResult<Vec<WishlistRecord>>;

    async fn add(&self, user_id: Uuid, product_id: Uuid) -> WishlistResult<WishlistRecord>;

    /// Delete the user's own row, returns false when absent or not theirs
    async fn remove(&self, id: Uuid, user_id: Uuid) -> WishlistResult<bool>;
}
