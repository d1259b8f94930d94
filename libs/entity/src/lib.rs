//! Sea-ORM entities for the shop schema.
//!
//! Every domain crate maps these rows into its own response DTOs; the
//! entities live in one crate because checkout, cancellation and payment
//! completion touch several tables inside one transaction.
//!
//! ```text
//! users ──< addresses         categories ──< products ──< product_images
//!   │  ──< carts ──< cart_items        │            ──< product_variants
//!   │  ──< orders ──< order_items      └──< categories (parent_id)
//!   │         └── payments
//!   │  ──< reviews >── products
//!   └──< wishlists >── products
//! coupons (referenced by orders.coupon_code)
//! ```

pub mod addresses;
pub mod cart_items;
pub mod carts;
pub mod categories;
pub mod coupons;
pub mod enums;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod product_images;
pub mod product_variants;
pub mod products;
pub mod reviews;
pub mod users;
pub mod wishlists;

pub use enums::{CouponType, OrderStatus, PaymentStatus, Role};

pub mod prelude {
    pub use super::addresses::Entity as Addresses;
    pub use super::cart_items::Entity as CartItems;
    pub use super::carts::Entity as Carts;
    pub use super::categories::Entity as Categories;
    pub use super::coupons::Entity as Coupons;
    pub use super::order_items::Entity as OrderItems;
    pub use super::orders::Entity as Orders;
    pub use super::payments::Entity as Payments;
    pub use super::product_images::Entity as ProductImages;
    pub use super::product_variants::Entity as ProductVariants;
    pub use super::products::Entity as Products;
    pub use super::reviews::Entity as Reviews;
    pub use super::users::Entity as Users;
    pub use super::wishlists::Entity as Wishlists;
}
