use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use entity::{categories, product_images, product_variants, products, reviews};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateVariant, NewImage, NewProduct, ProductFilter, UpdateProduct, UpdateVariant,
};
use crate::repository::{ProductRepository, RatingStats};

pub struct PgProductRepository {
    base: BaseRepository<products::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }
}

#[derive(Debug, FromQueryResult)]
struct RatingRow {
    average: Option<Decimal>,
    review_count: i64,
}

fn map_write_error(err: DbErr) -> ProductError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            if detail.contains("slug") {
                ProductError::Duplicate("slug")
            } else {
                ProductError::Duplicate("sku")
            }
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => ProductError::InUse,
        _ => err.into(),
    }
}

async fn insert_images<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    images: Vec<NewImage>,
) -> Result<Vec<product_images::Model>, DbErr> {
    let mut inserted = Vec::with_capacity(images.len());
    for image in images {
        let model = product_images::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            url: Set(image.url),
            alt_text: Set(image.alt_text),
            position: Set(image.position),
            created_at: Set(Utc::now().into()),
        }
        .insert(conn)
        .await?;
        inserted.push(model);
    }
    Ok(inserted)
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(
        &self,
        product: NewProduct,
        images: Vec<NewImage>,
    ) -> ProductResult<(products::Model, Vec<product_images::Model>)> {
        let NewProduct { input, slug } = product;
        let now = Utc::now().into();

        let txn = self.db().begin().await?;

        let model = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            price: Set(input.price),
            compare_price: Set(input.compare_price),
            sku: Set(input.sku),
            stock: Set(input.stock),
            weight: Set(input.weight),
            brand: Set(input.brand),
            category_id: Set(input.category_id),
            is_active: Set(input.is_active.unwrap_or(true)),
            expiry_date: Set(input.expiry_date.map(Into::into)),
            warranty_months: Set(input.warranty_months),
            dimensions: Set(input.dimensions),
            attributes: Set(input.attributes),
            tags: Set(json!(input.tags)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_write_error)?;

        let images = insert_images(&txn, model.id, images).await?;
        txn.commit().await?;

        tracing::info!(product_id = %model.id, sku = %model.sku, images = images.len(), "Created product");
        Ok((model, images))
    }

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<products::Model>> {
        Ok(self.base.find_by_id(id).await?)
    }

    async fn find_category(&self, id: Uuid) -> ProductResult<Option<categories::Model>> {
        Ok(categories::Entity::find_by_id(id).one(self.db()).await?)
    }

    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<products::Model>> {
        let mut query = products::Entity::find().filter(products::Column::IsActive.eq(true));

        if let Some(category_id) = filter.category_id {
            query = query.filter(products::Column::CategoryId.eq(category_id));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(Expr::cust_with_values(
                r#"LOWER("products"."name") LIKE $1"#,
                [pattern],
            ));
        }

        let models = query
            .order_by_desc(products::Column::CreatedAt)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.db())
            .await?;
        Ok(models)
    }

    async fn images_for(
        &self,
        product_ids: Vec<Uuid>,
    ) -> ProductResult<Vec<product_images::Model>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let images = product_images::Entity::find()
            .filter(product_images::Column::ProductId.is_in(product_ids))
            .order_by_asc(product_images::Column::Position)
            .all(self.db())
            .await?;
        Ok(images)
    }

    async fn variants_for(&self, product_id: Uuid) -> ProductResult<Vec<product_variants::Model>> {
        let variants = product_variants::Entity::find()
            .filter(product_variants::Column::ProductId.eq(product_id))
            .order_by_asc(product_variants::Column::CreatedAt)
            .all(self.db())
            .await?;
        Ok(variants)
    }

    async fn rating_stats(&self, product_id: Uuid) -> ProductResult<RatingStats> {
        let row = reviews::Entity::find()
            .select_only()
            .column_as(Func::avg(Expr::col(reviews::Column::Rating)), "average")
            .column_as(Func::count(Expr::col(reviews::Column::Id)), "review_count")
            .filter(reviews::Column::ProductId.eq(product_id))
            .into_model::<RatingRow>()
            .one(self.db())
            .await?;

        Ok(row
            .map(|row| RatingStats {
                average: row.average.and_then(|avg| avg.round_dp(1).to_f64()),
                count: row.review_count.max(0) as u64,
            })
            .unwrap_or_default())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UpdateProduct,
        images: Option<Vec<NewImage>>,
    ) -> ProductResult<products::Model> {
        let txn = self.db().begin().await?;

        let existing = products::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        let mut active = existing.into_active_model();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(compare_price) = changes.compare_price {
            active.compare_price = Set(Some(compare_price));
        }
        if let Some(sku) = changes.sku {
            active.sku = Set(sku);
        }
        if let Some(stock) = changes.stock {
            active.stock = Set(stock);
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(weight) = changes.weight {
            active.weight = Set(Some(weight));
        }
        if let Some(brand) = changes.brand {
            active.brand = Set(Some(brand));
        }
        if let Some(expiry_date) = changes.expiry_date {
            active.expiry_date = Set(Some(expiry_date.into()));
        }
        if let Some(warranty_months) = changes.warranty_months {
            active.warranty_months = Set(Some(warranty_months));
        }
        if let Some(dimensions) = changes.dimensions {
            active.dimensions = Set(Some(dimensions));
        }
        if let Some(attributes) = changes.attributes {
            active.attributes = Set(Some(attributes));
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(json!(tags));
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&txn).await.map_err(map_write_error)?;

        if let Some(images) = images {
            product_images::Entity::delete_many()
                .filter(product_images::Column::ProductId.eq(id))
                .exec(&txn)
                .await?;
            insert_images(&txn, id, images).await?;
        }

        txn.commit().await?;
        tracing::info!(product_id = %id, "Updated product");
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await.map_err(map_write_error)?;

        if rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn create_variant(
        &self,
        product_id: Uuid,
        input: CreateVariant,
    ) -> ProductResult<product_variants::Model> {
        let now = Utc::now().into();
        let model = product_variants::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            name: Set(input.name),
            sku: Set(input.sku),
            price: Set(input.price),
            stock: Set(input.stock),
            attributes: Set(input.attributes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db())
        .await
        .map_err(map_write_error)?;

        tracing::info!(product_id = %product_id, variant_id = %model.id, "Created variant");
        Ok(model)
    }

    async fn find_variant(
        &self,
        product_id: Uuid,
        variant_id: Uuid,
    ) -> ProductResult<Option<product_variants::Model>> {
        let variant = product_variants::Entity::find_by_id(variant_id)
            .filter(product_variants::Column::ProductId.eq(product_id))
            .one(self.db())
            .await?;
        Ok(variant)
    }

    async fn update_variant(
        &self,
        variant_id: Uuid,
        input: UpdateVariant,
    ) -> ProductResult<product_variants::Model> {
        let existing = product_variants::Entity::find_by_id(variant_id)
            .one(self.db())
            .await?
            .ok_or_else(|| ProductError::Internal(format!("variant {} vanished", variant_id)))?;
        let mut active = existing.into_active_model();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(sku) = input.sku {
            active.sku = Set(sku);
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(stock) = input.stock {
            active.stock = Set(stock);
        }
        if let Some(attributes) = input.attributes {
            active.attributes = Set(Some(attributes));
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(self.db()).await.map_err(map_write_error)?;
        tracing::info!(variant_id = %variant_id, "Updated variant");
        Ok(model)
    }

    async fn delete_variant(&self, variant_id: Uuid) -> ProductResult<bool> {
        let result = product_variants::Entity::delete_by_id(variant_id)
            .exec(self.db())
            .await
            .map_err(map_write_error)?;
        Ok(result.rows_affected > 0)
    }
}
