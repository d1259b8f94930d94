use async_trait::async_trait;
use entity::{cart_items, carts, product_variants, products};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::CartResult;
use crate::models::CartLine;

/// Repository trait for carts and their lines
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// The user's cart that is not checked out yet
    async fn active_cart(&self, user_id: Uuid) -> CartResult<Option<carts::Model>>;

    /// The active cart, created when the user has none
    async fn get_or_create(&self, user_id: Uuid) -> CartResult<carts::Model>;

    /// Lines of a cart, oldest first
    async fn lines(&self, cart_id: Uuid) -> CartResult<Vec<CartLine>>;

    async fn find_product(&self, id: Uuid) -> CartResult<Option<products::Model>>;

    async fn find_variant(&self, id: Uuid) -> CartResult<Option<product_variants::Model>>;

    /// The line for a (product, variant) pair, if any
    async fn find_line(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        variant_id: Option<Uuid>,
    ) -> CartResult<Option<cart_items::Model>>;

    /// A line by id, only when it belongs to `cart_id`
    async fn find_item(&self, cart_id: Uuid, item_id: Uuid)
    -> CartResult<Option<cart_items::Model>>;

    async fn insert_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        variant_id: Option<Uuid>,
        quantity: i32,
        price: Decimal,
    ) -> CartResult<cart_items::Model>;

    /// Set the quantity and refresh the unit price of a line
    async fn set_quantity(
        &self,
        item_id: Uuid,
        quantity: i32,
        price: Decimal,
    ) -> CartResult<cart_items::Model>;

    async fn delete_item(&self, item_id: Uuid) -> CartResult<bool>;

    /// Delete every line of a cart, returns the number removed
    async fn clear(&self, cart_id: Uuid) -> CartResult<u64>;
}
