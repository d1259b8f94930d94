use axum_helpers::MessageResponse;
use entity::{product_variants, products};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CartError, CartResult};
use crate::models::{AddToCart, Cart, UpdateCartItem};
use crate::repository::CartRepository;

pub struct CartService<R: CartRepository> {
    repository: Arc<R>,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// The user's active cart, created on first access
    pub async fn get_cart(&self, user_id: Uuid) -> CartResult<Cart> {
        let cart = self.repository.get_or_create(user_id).await?;
        let lines = self.repository.lines(cart.id).await?;
        Ok(Cart::build(cart, lines))
    }

    /// Add a product (or one of its variants), merging with an existing line
    pub async fn add_item(&self, user_id: Uuid, input: AddToCart) -> CartResult<Cart> {
        input
            .validate()
            .map_err(|e| CartError::Validation(e.to_string()))?;

        let product = self
            .repository
            .find_product(input.product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(CartError::ProductNotFound(input.product_id))?;
        let variant = match input.variant_id {
            Some(variant_id) => Some(self.variant_of(&product, variant_id).await?),
            None => None,
        };
        let (price, available) = price_and_stock(&product, variant.as_ref());

        let cart = self.repository.get_or_create(user_id).await?;
        let existing = self
            .repository
            .find_line(cart.id, product.id, input.variant_id)
            .await?;

        let quantity = existing.as_ref().map_or(0, |line| line.quantity) + input.quantity;
        if quantity > available {
            tracing::warn!(product_id = %product.id, requested = quantity, available, "Cart add exceeds stock");
            return Err(CartError::InsufficientStock { available });
        }

        match existing {
            Some(line) => {
                self.repository.set_quantity(line.id, quantity, price).await?;
            }
            None => {
                self.repository
                    .insert_item(cart.id, product.id, input.variant_id, quantity, price)
                    .await?;
            }
        }

        let lines = self.repository.lines(cart.id).await?;
        Ok(Cart::build(cart, lines))
    }

    /// Set a line's quantity, re-checking stock
    pub async fn update_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        input: UpdateCartItem,
    ) -> CartResult<Cart> {
        input
            .validate()
            .map_err(|e| CartError::Validation(e.to_string()))?;

        let cart = self
            .repository
            .active_cart(user_id)
            .await?
            .ok_or(CartError::CartNotFound)?;
        let item = self
            .repository
            .find_item(cart.id, item_id)
            .await?
            .ok_or(CartError::ItemNotFound(item_id))?;

        let product = self
            .repository
            .find_product(item.product_id)
            .await?
            .ok_or(CartError::ProductNotFound(item.product_id))?;
        let variant = match item.variant_id {
            Some(variant_id) => Some(self.variant_of(&product, variant_id).await?),
            None => None,
        };
        let (price, available) = price_and_stock(&product, variant.as_ref());

        if input.quantity > available {
            return Err(CartError::InsufficientStock { available });
        }
        self.repository
            .set_quantity(item.id, input.quantity, price)
            .await?;

        let lines = self.repository.lines(cart.id).await?;
        Ok(Cart::build(cart, lines))
    }

    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> CartResult<Cart> {
        let cart = self
            .repository
            .active_cart(user_id)
            .await?
            .ok_or(CartError::CartNotFound)?;
        if self.repository.find_item(cart.id, item_id).await?.is_none() {
            return Err(CartError::ItemNotFound(item_id));
        }
        self.repository.delete_item(item_id).await?;

        let lines = self.repository.lines(cart.id).await?;
        Ok(Cart::build(cart, lines))
    }

    pub async fn clear_cart(&self, user_id: Uuid) -> CartResult<MessageResponse> {
        let Some(cart) = self.repository.active_cart(user_id).await? else {
            return Ok(MessageResponse::new("Cart is already empty"));
        };
        if self.repository.clear(cart.id).await? == 0 {
            return Ok(MessageResponse::new("Cart is already empty"));
        }
        Ok(MessageResponse::new("Cart cleared successfully"))
    }

    async fn variant_of(
        &self,
        product: &products::Model,
        variant_id: Uuid,
    ) -> CartResult<product_variants::Model> {
        self.repository
            .find_variant(variant_id)
            .await?
            .filter(|v| v.product_id == product.id)
            .ok_or(CartError::InvalidVariant)
    }
}

/// Unit price and stock from the variant when one is selected
fn price_and_stock(
    product: &products::Model,
    variant: Option<&product_variants::Model>,
) -> (Decimal, i32) {
    match variant {
        Some(v) => (v.price, v.stock),
        None => (product.price, product.stock),
    }
}
