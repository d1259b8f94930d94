use domain_categories::{CategorySummary, slugify};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, CreateVariant, NewProduct, ProductDetail, ProductFilter, ProductImage,
    ProductWithImages, UpdateProduct, UpdateVariant, Variant, position_images,
};
use crate::repository::ProductRepository;

/// Service layer for catalog products
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create_product(&self, mut input: CreateProduct) -> ProductResult<ProductWithImages> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.ensure_category(input.category_id).await?;

        let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
        let images = position_images(std::mem::take(&mut input.images));

        let (product, images) = self
            .repository
            .create(NewProduct { input, slug }, images)
            .await?;

        Ok(ProductWithImages {
            product: product.into(),
            images: images.into_iter().map(ProductImage::from).collect(),
        })
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<ProductWithImages>> {
        let products = self.repository.list(filter).await?;
        let ids = products.iter().map(|p| p.id).collect();

        let mut images: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
        for image in self.repository.images_for(ids).await? {
            images
                .entry(image.product_id)
                .or_default()
                .push(image.into());
        }

        Ok(products
            .into_iter()
            .map(|product| ProductWithImages {
                images: images.remove(&product.id).unwrap_or_default(),
                product: product.into(),
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<ProductDetail> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let images = self.repository.images_for(vec![id]).await?;
        let variants = self.repository.variants_for(id).await?;
        let category = self.repository.find_category(product.category_id).await?;
        let stats = self.repository.rating_stats(id).await?;

        Ok(ProductDetail {
            product: product.into(),
            images: images.into_iter().map(ProductImage::from).collect(),
            variants: variants.into_iter().map(Variant::from).collect(),
            category: category.as_ref().map(CategorySummary::from),
            average_rating: stats.average,
            review_count: stats.count,
        })
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: Uuid,
        mut input: UpdateProduct,
    ) -> ProductResult<ProductWithImages> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }
        if let Some(category_id) = input.category_id {
            self.ensure_category(category_id).await?;
        }
        if let Some(raw) = input.slug.take() {
            input.slug = Some(resolve_slug(Some(&raw), &raw)?);
        }
        let images = input.images.take().map(position_images);

        let product = self.repository.update(id, input, images).await?;
        let images = self.repository.images_for(vec![id]).await?;

        Ok(ProductWithImages {
            product: product.into(),
            images: images.into_iter().map(ProductImage::from).collect(),
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn add_variant(&self, product_id: Uuid, input: CreateVariant) -> ProductResult<Variant> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if self.repository.find_by_id(product_id).await?.is_none() {
            return Err(ProductError::NotFound(product_id));
        }

        Ok(self.repository.create_variant(product_id, input).await?.into())
    }

    #[instrument(skip(self, input))]
    pub async fn update_variant(
        &self,
        product_id: Uuid,
        variant_id: Uuid,
        input: UpdateVariant,
    ) -> ProductResult<Variant> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.ensure_variant(product_id, variant_id).await?;
        Ok(self.repository.update_variant(variant_id, input).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_variant(&self, product_id: Uuid, variant_id: Uuid) -> ProductResult<()> {
        self.ensure_variant(product_id, variant_id).await?;
        self.repository.delete_variant(variant_id).await?;
        tracing::info!(%product_id, %variant_id, "Deleted variant");
        Ok(())
    }

    async fn ensure_category(&self, category_id: Uuid) -> ProductResult<()> {
        if self.repository.find_category(category_id).await?.is_none() {
            return Err(ProductError::CategoryNotFound(category_id));
        }
        Ok(())
    }

    async fn ensure_variant(&self, product_id: Uuid, variant_id: Uuid) -> ProductResult<()> {
        if self
            .repository
            .find_variant(product_id, variant_id)
            .await?
            .is_none()
        {
            return Err(ProductError::VariantNotFound {
                product_id,
                variant_id,
            });
        }
        Ok(())
    }
}

fn resolve_slug(explicit: Option<&str>, name: &str) -> ProductResult<String> {
    let slug = slugify(explicit.unwrap_or(name));
    if slug.is_empty() {
        return Err(ProductError::Validation(
            "Slug must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockProductRepository, RatingStats};
    use chrono::Utc;
    use entity::{categories, product_images, product_variants, products};
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn category(id: Uuid) -> categories::Model {
        let now = Utc::now().into();
        categories::Model {
            id,
            name: "Kitchen".into(),
            slug: "kitchen".into(),
            description: None,
            image_url: None,
            parent_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn product(id: Uuid, category_id: Uuid) -> products::Model {
        let now = Utc::now().into();
        products::Model {
            id,
            name: "Coffee Mug".into(),
            slug: "coffee-mug".into(),
            description: None,
            price: dec!(8.50),
            compare_price: None,
            sku: "MUG-1".into(),
            stock: 10,
            weight: None,
            brand: None,
            category_id,
            is_active: true,
            expiry_date: None,
            warranty_months: None,
            dimensions: None,
            attributes: None,
            tags: json!(["kitchen"]),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_input(category_id: Uuid) -> CreateProduct {
        serde_json::from_value(json!({
            "name": "Coffee Mug",
            "price": "8.50",
            "sku": "MUG-1",
            "category_id": category_id,
            "images": [
                { "url": "https://cdn.example.com/side.jpg", "position": 2 },
                { "url": "https://cdn.example.com/front.jpg", "position": 0 }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_resolves_slug_and_orders_images() {
        let mut mock_repo = MockProductRepository::new();
        let category_id = Uuid::new_v4();
        mock_repo
            .expect_find_category()
            .with(eq(category_id))
            .returning(|id| Ok(Some(category(id))));
        mock_repo
            .expect_create()
            .withf(|new, images| {
                new.slug == "coffee-mug"
                    && images.len() == 2
                    && images[0].url.ends_with("front.jpg")
            })
            .returning(move |new, images| {
                let model = product(Uuid::new_v4(), new.input.category_id);
                let images = images
                    .into_iter()
                    .map(|image| product_images::Model {
                        id: Uuid::new_v4(),
                        product_id: model.id,
                        url: image.url,
                        alt_text: image.alt_text,
                        position: image.position,
                        created_at: Utc::now().into(),
                    })
                    .collect();
                Ok((model, images))
            });

        let service = ProductService::new(mock_repo);
        let created = service
            .create_product(create_input(category_id))
            .await
            .unwrap();

        assert_eq!(created.product.slug, "coffee-mug");
        assert_eq!(created.product.tags, vec!["kitchen".to_string()]);
        assert_eq!(created.images[0].position, 0);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_category().returning(|_| Ok(None));
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let err = service
            .create_product(create_input(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::CategoryNotFound(_)));
    }

    #[tokio::test]
    async fn test_get_product_assembles_detail() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        mock_repo
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |id| Ok(Some(product(id, category_id))));
        mock_repo.expect_images_for().returning(|_| Ok(vec![]));
        mock_repo.expect_variants_for().returning(move |product_id| {
            let now = Utc::now().into();
            Ok(vec![product_variants::Model {
                id: Uuid::new_v4(),
                product_id,
                name: "Large".into(),
                sku: "MUG-1-L".into(),
                price: dec!(9.50),
                stock: 3,
                attributes: None,
                created_at: now,
                updated_at: now,
            }])
        });
        mock_repo
            .expect_find_category()
            .returning(|id| Ok(Some(category(id))));
        mock_repo.expect_rating_stats().returning(|_| {
            Ok(RatingStats {
                average: Some(4.5),
                count: 2,
            })
        });

        let service = ProductService::new(mock_repo);
        let detail = service.get_product(id).await.unwrap();

        assert_eq!(detail.variants.len(), 1);
        assert_eq!(detail.category.map(|c| c.slug), Some("kitchen".to_string()));
        assert_eq!(detail.average_rating, Some(4.5));
        assert_eq!(detail.review_count, 2);
    }

    #[tokio::test]
    async fn test_variant_must_belong_to_product() {
        let mut mock_repo = MockProductRepository::new();
        let product_id = Uuid::new_v4();
        let variant_id = Uuid::new_v4();
        mock_repo
            .expect_find_variant()
            .with(eq(product_id), eq(variant_id))
            .returning(|_, _| Ok(None));
        mock_repo.expect_delete_variant().never();

        let service = ProductService::new(mock_repo);
        let err = service
            .delete_variant(product_id, variant_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::VariantNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        assert!(matches!(
            service.delete_product(Uuid::new_v4()).await,
            Err(ProductError::NotFound(_))
        ));
    }
}
