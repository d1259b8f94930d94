//! Reviews Domain
//!
//! One review per user and product. Reading is public; writing needs a
//! login and only touches the caller's own reviews.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ReviewError, ReviewResult};
pub use models::{CreateReview, Review, ReviewQuery, UpdateReview};
pub use postgres::PgReviewRepository;
pub use repository::ReviewRepository;
pub use service::ReviewService;
