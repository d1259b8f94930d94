//! Wishlist Domain
//!
//! Per-user saved products. `toggle` flips membership, so calling it twice
//! leaves the wishlist as it was.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{WishlistError, WishlistResult};
pub use models::{ToggleAction, ToggleResponse, WishlistItem, WishlistProduct};
pub use postgres::PgWishlistRepository;
pub use repository::WishlistRepository;
pub use service::WishlistService;
