use async_trait::async_trait;
use entity::{categories, product_images, product_variants, products};
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{
    CreateVariant, NewImage, NewProduct, ProductFilter, UpdateProduct, UpdateVariant,
};

/// Review aggregate for one product
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingStats {
    pub average: Option<f64>,
    pub count: u64,
}

/// Repository trait for products, their images and variants
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert the product and its images in one transaction
    async fn create(
        &self,
        product: NewProduct,
        images: Vec<NewImage>,
    ) -> ProductResult<(products::Model, Vec<product_images::Model>)>;

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<products::Model>>;

    async fn find_category(&self, id: Uuid) -> ProductResult<Option<categories::Model>>;

    /// Active products newest first
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<products::Model>>;

    /// Images of several products, ordered by position
    async fn images_for(&self, product_ids: Vec<Uuid>)
    -> ProductResult<Vec<product_images::Model>>;

    async fn variants_for(&self, product_id: Uuid) -> ProductResult<Vec<product_variants::Model>>;

    async fn rating_stats(&self, product_id: Uuid) -> ProductResult<RatingStats>;

    /// Partial update; `images`, when given, replaces the image set in the same transaction
    async fn update(
        &self,
        id: Uuid,
        changes: UpdateProduct,
        images: Option<Vec<NewImage>>,
    ) -> ProductResult<products::Model>;

    /// Delete a product, returns false when absent
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    async fn create_variant(
        &self,
        product_id: Uuid,
        input: CreateVariant,
    ) -> ProductResult<product_variants::Model>;

    /// Variant scoped to its product
    async fn find_variant(
        &self,
        product_id: Uuid,
        variant_id: Uuid,
    ) -> ProductResult<Option<product_variants::Model>>;

    async fn update_variant(
        &self,
        variant_id: Uuid,
        input: UpdateVariant,
    ) -> ProductResult<product_variants::Model>;

    async fn delete_variant(&self, variant_id: Uuid) -> ProductResult<bool>;
}
