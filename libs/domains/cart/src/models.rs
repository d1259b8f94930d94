use chrono::{DateTime, Utc};
use entity::{cart_items, carts, product_variants, products};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One cart line as the client sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_slug: String,
    /// First product image by position
    pub image_url: Option<String>,
    pub variant_id: Option<Uuid>,
    pub variant_name: Option<String>,
    pub quantity: i32,
    #[schema(example = "19.99")]
    pub unit_price: Decimal,
    #[schema(example = "39.98")]
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItem>,
    #[schema(example = "39.98")]
    pub total: Decimal,
    /// Sum of line quantities
    pub item_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn build(cart: carts::Model, lines: Vec<CartLine>) -> Self {
        let items: Vec<CartItem> = lines.into_iter().map(CartItem::from).collect();
        Self {
            id: cart.id,
            user_id: cart.user_id,
            total: items.iter().map(|i| i.subtotal).sum(),
            item_count: items.iter().map(|i| i.quantity).sum(),
            items,
            created_at: cart.created_at.with_timezone(&Utc),
            updated_at: cart.updated_at.with_timezone(&Utc),
        }
    }
}

/// A stored cart line joined with what it points at
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: cart_items::Model,
    pub product: products::Model,
    pub variant: Option<product_variants::Model>,
    pub image_url: Option<String>,
}

impl From<CartLine> for CartItem {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.item.id,
            product_id: line.product.id,
            product_name: line.product.name,
            product_slug: line.product.slug,
            image_url: line.image_url,
            variant_id: line.item.variant_id,
            variant_name: line.variant.map(|v| v.name),
            quantity: line.item.quantity,
            unit_price: line.item.price,
            subtotal: line.item.price * Decimal::from(line.item.quantity),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddToCart {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    #[validate(range(min = 1, max = 1000))]
    #[schema(example = 1)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItem {
    #[validate(range(min = 1, max = 1000))]
    pub quantity: i32,
}
