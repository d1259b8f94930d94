//! PostgreSQL plumbing shared by the shop services
//!
//! - [`postgres`]: pool config from env, connect with retry, migrations, health check
//! - [`BaseRepository`]: primary-key helpers for UUID-keyed entities
//! - [`RetryConfig`]: exponential backoff used while the database comes up

pub mod common;
pub mod postgres;
mod repository;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
pub use repository::BaseRepository;
