//! Addresses Domain
//!
//! Saved shipping addresses. Each user has at most one default: the first
//! address becomes default, and making another one default clears the flag
//! on the rest in the same transaction.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{AddressError, AddressResult};
pub use models::{Address, CreateAddress, UpdateAddress};
pub use postgres::PgAddressRepository;
pub use repository::{AddressRepository, InMemoryAddressRepository};
pub use service::AddressService;
