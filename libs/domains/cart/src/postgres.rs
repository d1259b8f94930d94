use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use entity::{cart_items, carts, product_images, product_variants, products};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, SqlErr,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{CartError, CartResult};
use crate::models::CartLine;
use crate::repository::CartRepository;

pub struct PgCartRepository {
    base: BaseRepository<carts::Entity>,
}

impl PgCartRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn active_cart(&self, user_id: Uuid) -> CartResult<Option<carts::Model>> {
        let cart = carts::Entity::find()
            .filter(carts::Column::UserId.eq(user_id))
            .filter(carts::Column::IsCheckedOut.eq(false))
            .one(self.db())
            .await?;
        Ok(cart)
    }

    async fn get_or_create(&self, user_id: Uuid) -> CartResult<carts::Model> {
        if let Some(cart) = self.active_cart(user_id).await? {
            return Ok(cart);
        }

        let now = Utc::now().into();
        let inserted = carts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            is_checked_out: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db())
        .await;

        match inserted {
            Ok(cart) => {
                tracing::info!(cart_id = %cart.id, user_id = %user_id, "Created cart");
                Ok(cart)
            }
            // A concurrent request created the open cart first.
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => self
                .active_cart(user_id)
                .await?
                .ok_or_else(|| CartError::Internal("open cart vanished".to_string())),
            Err(err) => Err(err.into()),
        }
    }

    async fn lines(&self, cart_id: Uuid) -> CartResult<Vec<CartLine>> {
        let items = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart_id))
            .order_by_asc(cart_items::Column::CreatedAt)
            .all(self.db())
            .await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let variant_ids: Vec<Uuid> = items.iter().filter_map(|i| i.variant_id).collect();

        let product_map: HashMap<Uuid, products::Model> = products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids.clone()))
            .all(self.db())
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let variant_map: HashMap<Uuid, product_variants::Model> = if variant_ids.is_empty() {
            HashMap::new()
        } else {
            product_variants::Entity::find()
                .filter(product_variants::Column::Id.is_in(variant_ids))
                .all(self.db())
                .await?
                .into_iter()
                .map(|v| (v.id, v))
                .collect()
        };

        let mut images: HashMap<Uuid, String> = HashMap::new();
        for image in product_images::Entity::find()
            .filter(product_images::Column::ProductId.is_in(product_ids))
            .order_by_asc(product_images::Column::Position)
            .all(self.db())
            .await?
        {
            images.entry(image.product_id).or_insert(image.url);
        }

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            // Product deleted between the two queries.
            let Some(product) = product_map.get(&item.product_id).cloned() else {
                continue;
            };
            let variant = item.variant_id.and_then(|id| variant_map.get(&id).cloned());
            let image_url = images.get(&item.product_id).cloned();
            lines.push(CartLine {
                item,
                product,
                variant,
                image_url,
            });
        }
        Ok(lines)
    }

    async fn find_product(&self, id: Uuid) -> CartResult<Option<products::Model>> {
        Ok(products::Entity::find_by_id(id).one(self.db()).await?)
    }

    async fn find_variant(&self, id: Uuid) -> CartResult<Option<product_variants::Model>> {
        Ok(product_variants::Entity::find_by_id(id).one(self.db()).await?)
    }

    async fn find_line(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        variant_id: Option<Uuid>,
    ) -> CartResult<Option<cart_items::Model>> {
        let mut query = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart_id))
            .filter(cart_items::Column::ProductId.eq(product_id));
        query = match variant_id {
            Some(id) => query.filter(cart_items::Column::VariantId.eq(id)),
            None => query.filter(cart_items::Column::VariantId.is_null()),
        };
        Ok(query.one(self.db()).await?)
    }

    async fn find_item(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
    ) -> CartResult<Option<cart_items::Model>> {
        let item = cart_items::Entity::find_by_id(item_id)
            .filter(cart_items::Column::CartId.eq(cart_id))
            .one(self.db())
            .await?;
        Ok(item)
    }

    async fn insert_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        variant_id: Option<Uuid>,
        quantity: i32,
        price: Decimal,
    ) -> CartResult<cart_items::Model> {
        let now = Utc::now().into();
        let item = cart_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            cart_id: Set(cart_id),
            product_id: Set(product_id),
            variant_id: Set(variant_id),
            quantity: Set(quantity),
            price: Set(price),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db())
        .await?;

        tracing::info!(cart_id = %cart_id, item_id = %item.id, quantity, "Added cart line");
        Ok(item)
    }

    async fn set_quantity(
        &self,
        item_id: Uuid,
        quantity: i32,
        price: Decimal,
    ) -> CartResult<cart_items::Model> {
        let existing = cart_items::Entity::find_by_id(item_id)
            .one(self.db())
            .await?
            .ok_or(CartError::ItemNotFound(item_id))?;

        let mut active = existing.into_active_model();
        active.quantity = Set(quantity);
        active.price = Set(price);
        active.updated_at = Set(Utc::now().into());
        let item = active.update(self.db()).await?;

        tracing::info!(item_id = %item_id, quantity, "Updated cart line");
        Ok(item)
    }

    async fn delete_item(&self, item_id: Uuid) -> CartResult<bool> {
        let result = cart_items::Entity::delete_by_id(item_id)
            .exec(self.db())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn clear(&self, cart_id: Uuid) -> CartResult<u64> {
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart_id))
            .exec(self.db())
            .await?;

        tracing::info!(cart_id = %cart_id, removed = result.rows_affected, "Cleared cart");
        Ok(result.rows_affected)
    }
}
