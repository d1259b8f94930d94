use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use entity::{product_images, products, wishlists};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::WishlistResult;
use crate::models::WishlistRecord;
use crate::repository::WishlistRepository;

pub struct PgWishlistRepository {
    base: BaseRepository<wishlists::Entity>,
}

impl PgWishlistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }

    /// Main image (lowest position) per product
    async fn main_images(&self, product_ids: Vec<Uuid>) -> WishlistResult<HashMap<Uuid, String>> {
        let mut images = HashMap::new();
        for image in product_images::Entity::find()
            .filter(product_images::Column::ProductId.is_in(product_ids))
            .order_by_asc(product_images::Column::Position)
            .all(self.db())
            .await?
        {
            images.entry(image.product_id).or_insert(image.url);
        }
        Ok(images)
    }
}

#[async_trait]
impl WishlistRepository for PgWishlistRepository {
    async fn product_exists(&self, product_id: Uuid) -> WishlistResult<bool> {
        let count = products::Entity::find_by_id(product_id)
            .count(self.db())
            .await?;
        Ok(count > 0)
    }

    async fn find_by_user_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> WishlistResult<Option<wishlists::Model>> {
        let entry = wishlists::Entity::find()
            .filter(wishlists::Column::UserId.eq(user_id))
            .filter(wishlists::Column::ProductId.eq(product_id))
            .one(self.db())
            .await?;
        Ok(entry)
    }

    async fn list(&self, user_id: Uuid) -> WishlistResult<Vec<WishlistRecord>> {
        let rows = wishlists::Entity::find()
            .find_also_related(products::Entity)
            .filter(wishlists::Column::UserId.eq(user_id))
            .order_by_desc(wishlists::Column::CreatedAt)
            .all(self.db())
            .await?;

        let product_ids = rows.iter().map(|(entry, _)| entry.product_id).collect();
        let images = self.main_images(product_ids).await?;

        Ok(rows
            .into_iter()
            .map(|(entry, product)| WishlistRecord {
                image_url: images.get(&entry.product_id).cloned(),
                entry,
                product,
            })
            .collect())
    }

    async fn add(&self, user_id: Uuid, product_id: Uuid) -> WishlistResult<WishlistRecord> {
        let entry = wishlists::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db())
        .await?;

        let product = products::Entity::find_by_id(product_id)
            .one(self.db())
            .await?;
        let image_url = self.main_images(vec![product_id]).await?.remove(&product_id);

        tracing::info!(user_id = %user_id, product_id = %product_id, "Added to wishlist");
        Ok(WishlistRecord {
            entry,
            product,
            image_url,
        })
    }

    async fn remove(&self, id: Uuid, user_id: Uuid) -> WishlistResult<bool> {
        let result = wishlists::Entity::delete_many()
            .filter(wishlists::Column::Id.eq(id))
            .filter(wishlists::Column::UserId.eq(user_id))
            .exec(self.db())
            .await?;
        if result.rows_affected > 0 {
            tracing::info!(wishlist_id = %id, "Removed from wishlist");
        }
        Ok(result.rows_affected > 0)
    }
}
