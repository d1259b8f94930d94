use chrono::{DateTime, Utc};
use entity::{products, wishlists};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The product fields a wishlist shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WishlistProduct {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[schema(example = "24.90")]
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub is_active: bool,
}

impl WishlistProduct {
    pub fn new(product: products::Model, image_url: Option<String>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            slug: product.slug,
            price: product.price,
            compare_price: product.compare_price,
            image_url,
            in_stock: product.stock > 0,
            is_active: product.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WishlistItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product: Option<WishlistProduct>,
    pub created_at: DateTime<Utc>,
}

/// A wishlist row with its product and main image
#[derive(Debug, Clone)]
pub struct WishlistRecord {
    pub entry: wishlists::Model,
    pub product: Option<products::Model>,
    pub image_url: Option<String>,
}

impl From<WishlistRecord> for WishlistItem {
    fn from(record: WishlistRecord) -> Self {
        let WishlistRecord {
            entry,
            product,
            image_url,
        } = record;
        Self {
            id: entry.id,
            product_id: entry.product_id,
            product: product.map(|p| WishlistProduct::new(p, image_url)),
            created_at: entry.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Added,
    Removed,
}

/// Result of `POST /wishlist/toggle/{product_id}`
///
/// `item` is set when the product was added, `product_id` when it was removed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToggleResponse {
    pub success: bool,
    pub action: ToggleAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<WishlistItem>,
}

impl ToggleResponse {
    pub fn added(item: WishlistItem) -> Self {
        Self {
            success: true,
            action: ToggleAction::Added,
            product_id: None,
            item: Some(item),
        }
    }

    pub fn removed(product_id: Uuid) -> Self {
        Self {
            success: true,
            action: ToggleAction::Removed,
            product_id: Some(product_id),
            item: None,
        }
    }
}
