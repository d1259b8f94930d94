//! Cart Domain
//!
//! One open cart per user, created on first access. Lines are keyed by
//! (product, variant) and carry the unit price from when they were last
//! touched; the order checkout reads and closes the cart.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CartError, CartResult};
pub use models::{AddToCart, Cart, CartItem, CartLine, UpdateCartItem};
pub use postgres::PgCartRepository;
pub use repository::CartRepository;
pub use service::CartService;
