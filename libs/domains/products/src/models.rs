use axum_helpers::validation::non_negative;
use chrono::{DateTime, Utc};
use domain_categories::CategorySummary;
use entity::{product_images, product_variants, products};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub sku: String,
    pub stock: i32,
    pub weight: Option<Decimal>,
    pub brand: Option<String>,
    pub category_id: Uuid,
    pub is_active: bool,
    pub expiry_date: Option<DateTime<Utc>>,
    pub warranty_months: Option<i32>,
    pub dimensions: Option<Value>,
    pub attributes: Option<Value>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        let tags = serde_json::from_value(model.tags).unwrap_or_default();
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            price: model.price,
            compare_price: model.compare_price,
            sku: model.sku,
            stock: model.stock,
            weight: model.weight,
            brand: model.brand,
            category_id: model.category_id,
            is_active: model.is_active,
            expiry_date: model.expiry_date.map(Into::into),
            warranty_months: model.warranty_months,
            dimensions: model.dimensions,
            attributes: model.attributes,
            tags,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub position: i32,
}

impl From<product_images::Model> for ProductImage {
    fn from(model: product_images::Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            alt_text: model.alt_text,
            position: model.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub stock: i32,
    pub attributes: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_variants::Model> for Variant {
    fn from(model: product_variants::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            name: model.name,
            sku: model.sku,
            price: model.price,
            stock: model.stock,
            attributes: model.attributes,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// List entry and create/update response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductWithImages {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub variants: Vec<Variant>,
    pub category: Option<CategorySummary>,
    /// Mean rating rounded to one decimal, `null` without reviews
    pub average_rating: Option<f64>,
    pub review_count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ImageInput {
    #[validate(url)]
    pub url: String,
    #[validate(length(max = 255))]
    pub alt_text: Option<String>,
    /// Defaults to the index in the submitted list
    #[validate(range(min = 0))]
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 220))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[schema(example = "19.99")]
    pub price: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub compare_price: Option<Decimal>,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    pub category_id: Uuid,
    #[validate(custom(function = "non_negative"))]
    pub weight: Option<Decimal>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0, max = 240))]
    pub warranty_months: Option<i32>,
    pub dimensions: Option<Value>,
    pub attributes: Option<Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<ImageInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 220))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub compare_price: Option<Decimal>,
    #[validate(length(min = 1, max = 64))]
    pub sku: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub category_id: Option<Uuid>,
    #[validate(custom(function = "non_negative"))]
    pub weight: Option<Decimal>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0, max = 240))]
    pub warranty_months: Option<i32>,
    pub dimensions: Option<Value>,
    pub attributes: Option<Value>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
    /// Replaces the whole image set when present
    #[validate(nested)]
    pub images: Option<Vec<ImageInput>>,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    /// Case-insensitive match on the product name
    #[validate(length(min = 1, max = 100))]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    #[serde(default)]
    #[validate(range(max = 100_000_000))]
    pub offset: u64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category_id: None,
            search: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVariant {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Large / Blue")]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    pub attributes: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVariant {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub sku: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub attributes: Option<Value>,
}

/// Row ready for insertion: slug resolved, images positioned
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub input: CreateProduct,
    pub slug: String,
}

/// Image row ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub url: String,
    pub alt_text: Option<String>,
    pub position: i32,
}

/// Explicit positions win; otherwise the list index is used.
pub fn position_images(images: Vec<ImageInput>) -> Vec<NewImage> {
    let mut positioned: Vec<NewImage> = images
        .into_iter()
        .enumerate()
        .map(|(index, image)| NewImage {
            url: image.url,
            alt_text: image.alt_text,
            position: image.position.unwrap_or(index as i32),
        })
        .collect();
    positioned.sort_by_key(|image| image.position);
    positioned
}
