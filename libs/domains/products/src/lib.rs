//! Products Domain
//!
//! Catalog products with ordered images and purchasable variants.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────────┐     ┌───────────────────┐
//! │  handlers   │ ──► │ ProductService │ ──► │ ProductRepository │
//! └─────────────┘     └────────────────┘     └─────────┬─────────┘
//!                                                      │
//!                                          ┌───────────▼──────────┐
//!                                          │ PgProductRepository  │
//!                                          │ (product + images in │
//!                                          │  one transaction)    │
//!                                          └──────────────────────┘
//! ```
//!
//! Prices are `Decimal` and serialize as strings. Slugs come from
//! [`domain_categories::slugify`].

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use models::{
    CreateProduct, CreateVariant, ImageInput, Product, ProductDetail, ProductFilter, ProductImage,
    ProductWithImages, UpdateProduct, UpdateVariant, Variant,
};
pub use postgres::PgProductRepository;
pub use repository::{ProductRepository, RatingStats};
pub use service::ProductService;
