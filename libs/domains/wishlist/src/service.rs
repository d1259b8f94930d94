use std::sync::Arc;
use uuid::Uuid;

use crate::error::{WishlistError, WishlistResult};
use crate::models::{ToggleResponse, WishlistItem};
use crate::repository::WishlistRepository;

pub struct WishlistService<R: WishlistRepository> {
    repository: Arc<R>,
}

impl<R: WishlistRepository> WishlistService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list(&self, user_id: Uuid) -> WishlistResult<Vec<WishlistItem>> {
        let records = self.repository.list(user_id).await?;
        Ok(records.into_iter().map(WishlistItem::from).collect())
    }

    /// Add the product when absent, remove it when present
    pub async fn toggle(&self, user_id: Uuid, product_id: Uuid) -> WishlistResult<ToggleResponse> {
        if !self.repository.product_exists(product_id).await? {
            return Err(WishlistError::ProductNotFound(product_id));
        }

        match self
            .repository
            .find_by_user_product(user_id, product_id)
            .await?
        {
            Some(entry) => {
                self.repository.remove(entry.id, user_id).await?;
                Ok(ToggleResponse::removed(product_id))
            }
            None => {
                let record = self.repository.add(user_id, product_id).await?;
                Ok(ToggleResponse::added(record.into()))
            }
        }
    }

    pub async fn remove(&self, user_id: Uuid, id: Uuid) -> WishlistResult<()> {
        if !self.repository.remove(id, user_id).await? {
            return Err(WishlistError::ItemNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ToggleAction, WishlistRecord};
    use crate::repository::MockWishlistRepository;
    use chrono::Utc;
    use entity::wishlists;

    fn entry(user_id: Uuid, product_id: Uuid) -> wishlists::Model {
        wishlists::Model {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_toggle_adds_when_absent() {
        let mut mock = MockWishlistRepository::new();
        mock.expect_product_exists().returning(|_| Ok(true));
        mock.expect_find_by_user_product().returning(|_, _| Ok(None));
        mock.expect_add().times(1).returning(|user_id, product_id| {
            Ok(WishlistRecord {
                entry: entry(user_id, product_id),
                product: None,
                image_url: None,
            })
        });
        mock.expect_remove().never();

        let service = WishlistService::new(mock);
        let product_id = Uuid::new_v4();
        let response = service.toggle(Uuid::new_v4(), product_id).await.unwrap();
        assert_eq!(response.action, ToggleAction::Added);
        assert_eq!(response.item.unwrap().product_id, product_id);
    }

    #[tokio::test]
    async fn test_toggle_removes_when_present() {
        let user_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let existing = entry(user_id, product_id);
        let existing_id = existing.id;

        let mut mock = MockWishlistRepository::new();
        mock.expect_product_exists().returning(|_| Ok(true));
        mock.expect_find_by_user_product()
            .returning(move |_, _| Ok(Some(existing.clone())));
        mock.expect_remove()
            .withf(move |id, owner| *id == existing_id && *owner == user_id)
            .returning(|_, _| Ok(true));
        mock.expect_add().never();

        let service = WishlistService::new(mock);
        let response = service.toggle(user_id, product_id).await.unwrap();
        assert_eq!(response.action, ToggleAction::Removed);
        assert_eq!(response.product_id, Some(product_id));
    }

    #[tokio::test]
    async fn test_toggle_unknown_product() {
        let mut mock = MockWishlistRepository::new();
        mock.expect_product_exists().returning(|_| Ok(false));

        let service = WishlistService::new(mock);
        let err = service
            .toggle(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, WishlistError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_foreign_item() {
        let mut mock = MockWishlistRepository::new();
        mock.expect_remove().returning(|_, _| Ok(false));

        let service = WishlistService::new(mock);
        let err = service
            .remove(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Wishlist item not found");
    }
}
