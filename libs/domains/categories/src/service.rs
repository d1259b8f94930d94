use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{
    Category, CategoryDetail, CategoryProduct, CategorySummary, CategoryWithChildren,
    CreateCategory, NewCategory, UpdateCategory,
};
use crate::repository::CategoryRepository;
use crate::slug::slugify;

pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_category(&self, input: CreateCategory) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        let slug = resolve_slug(input.slug.as_deref(), &input.name)?;

        if let Some(parent_id) = input.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }
        if self.repository.slug_taken(&slug, None).await? {
            return Err(CategoryError::DuplicateSlug(slug));
        }

        let model = self
            .repository
            .create(NewCategory {
                name: input.name.trim().to_string(),
                slug,
                description: input.description,
                image_url: input.image_url,
                parent_id: input.parent_id,
                is_active: input.is_active.unwrap_or(true),
            })
            .await?;

        Ok(model.into())
    }

    /// Active categories ordered by name, each with its active children
    pub async fn list_categories(&self) -> CategoryResult<Vec<CategoryWithChildren>> {
        let categories = self.repository.list_active().await?;

        let mut children: HashMap<Uuid, Vec<CategorySummary>> = HashMap::new();
        for category in &categories {
            if let Some(parent_id) = category.parent_id {
                children
                    .entry(parent_id)
                    .or_default()
                    .push(CategorySummary::from(category));
            }
        }

        Ok(categories
            .into_iter()
            .map(|model| CategoryWithChildren {
                children: children.remove(&model.id).unwrap_or_default(),
                category: model.into(),
            })
            .collect())
    }

    pub async fn get_category(&self, id: Uuid) -> CategoryResult<CategoryDetail> {
        let model = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let parent = match model.parent_id {
            Some(parent_id) => self
                .repository
                .find_by_id(parent_id)
                .await?
                .as_ref()
                .map(CategorySummary::from),
            None => None,
        };
        let children = self
            .repository
            .children(id)
            .await?
            .iter()
            .map(CategorySummary::from)
            .collect();
        let products = self
            .repository
            .active_products(id)
            .await?
            .into_iter()
            .map(CategoryProduct::from)
            .collect();

        Ok(CategoryDetail {
            category: model.into(),
            parent,
            children,
            products,
        })
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        mut input: UpdateCategory,
    ) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(CategoryError::NotFound(id));
        }

        if let Some(parent_id) = input.parent_id {
            if parent_id == id {
                return Err(CategoryError::SelfParent);
            }
            self.ensure_parent_exists(parent_id).await?;
        }

        if let Some(raw) = input.slug.take() {
            let slug = resolve_slug(Some(&raw), &raw)?;
            if self.repository.slug_taken(&slug, Some(id)).await? {
                return Err(CategoryError::DuplicateSlug(slug));
            }
            input.slug = Some(slug);
        }

        Ok(self.repository.update(id, input).await?.into())
    }

    pub async fn delete_category(&self, id: Uuid) -> CategoryResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CategoryError::NotFound(id));
        }
        Ok(())
    }

    async fn ensure_parent_exists(&self, parent_id: Uuid) -> CategoryResult<()> {
        if self.repository.find_by_id(parent_id).await?.is_none() {
            return Err(CategoryError::ParentNotFound(parent_id));
        }
        Ok(())
    }
}

/// Normalize an explicit slug, or derive one from the name
fn resolve_slug(explicit: Option<&str>, name: &str) -> CategoryResult<String> {
    let slug = slugify(explicit.unwrap_or(name));
    if slug.is_empty() {
        return Err(CategoryError::Validation(
            "Slug must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}
