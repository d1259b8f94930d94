//! Categories Domain
//!
//! A self-referencing category tree. Slugs are derived from names with
//! [`slugify`], which the products domain reuses.
//!
//! ```text
//! handlers ─► CategoryService ─► CategoryRepository ─► PgCategoryRepository
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
mod slug;

pub use error::{CategoryError, CategoryResult};
pub use models::{
    Category, CategoryDetail, CategoryProduct, CategorySummary, CategoryWithChildren,
    CreateCategory, NewCategory, UpdateCategory,
};
pub use postgres::PgCategoryRepository;
pub use repository::CategoryRepository;
pub use service::CategoryService;
pub use slug::slugify;
