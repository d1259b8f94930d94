use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use entity::{categories, products};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{NewCategory, UpdateCategory};
use crate::repository::CategoryRepository;

pub struct PgCategoryRepository {
    base: BaseRepository<categories::Entity>,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn map_write_error(err: DbErr, slug: &str) -> CategoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => CategoryError::DuplicateSlug(slug.to_string()),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => CategoryError::HasProducts,
        _ => err.into(),
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, input: NewCategory) -> CategoryResult<categories::Model> {
        let now = Utc::now().into();
        let slug = input.slug.clone();

        let model = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            slug: Set(input.slug),
            description: Set(input.description),
            image_url: Set(input.image_url),
            parent_id: Set(input.parent_id),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.base.db())
        .await
        .map_err(|e| map_write_error(e, &slug))?;

        tracing::info!(category_id = %model.id, slug = %model.slug, "Created category");
        Ok(model)
    }

    async fn find_by_id(&self, id: Uuid) -> CategoryResult<Option<categories::Model>> {
        Ok(self.base.find_by_id(id).await?)
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> CategoryResult<bool> {
        let mut query = categories::Entity::find().filter(categories::Column::Slug.eq(slug));
        if let Some(id) = exclude {
            query = query.filter(categories::Column::Id.ne(id));
        }
        Ok(query.one(self.base.db()).await?.is_some())
    }

    async fn list_active(&self) -> CategoryResult<Vec<categories::Model>> {
        let models = categories::Entity::find()
            .filter(categories::Column::IsActive.eq(true))
            .order_by_asc(categories::Column::Name)
            .all(self.base.db())
            .await?;
        Ok(models)
    }

    async fn children(&self, parent_id: Uuid) -> CategoryResult<Vec<categories::Model>> {
        let models = categories::Entity::find()
            .filter(categories::Column::ParentId.eq(parent_id))
            .filter(categories::Column::IsActive.eq(true))
            .order_by_asc(categories::Column::Name)
            .all(self.base.db())
            .await?;
        Ok(models)
    }

    async fn active_products(&self, category_id: Uuid) -> CategoryResult<Vec<products::Model>> {
        let models = products::Entity::find()
            .filter(products::Column::CategoryId.eq(category_id))
            .filter(products::Column::IsActive.eq(true))
            .order_by_desc(products::Column::CreatedAt)
            .all(self.base.db())
            .await?;
        Ok(models)
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<categories::Model> {
        let existing = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))?;
        let slug = input.slug.clone().unwrap_or_else(|| existing.slug.clone());
        let mut active = existing.into_active_model();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(slug) = input.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(Some(parent_id));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let model = active
            .update(self.base.db())
            .await
            .map_err(|e| map_write_error(e, &slug))?;

        tracing::info!(category_id = %id, "Updated category");
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let rows_affected = self
            .base
            .delete_by_id(id)
            .await
            .map_err(|e| map_write_error(e, ""))?;

        if rows_affected > 0 {
            tracing::info!(category_id = %id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
