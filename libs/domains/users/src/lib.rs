//! Users Domain
//!
//! Accounts, credentials and the token lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ auth_handlers │   handlers   │  ← /auth/* and /users/*
//! └──────────────┬───────────────┘
//!                │
//!         ┌──────▼──────┐
//!         │ UserService │  ← Argon2 hashing, JWT issuing, refresh rotation
//!         └──────┬──────┘
//!                │
//!         ┌──────▼──────┐
//!         │ Repository  │  ← trait + Postgres / in-memory implementations
//!         └─────────────┘
//! ```
//!
//! Access tokens are stateless. Each user row stores the SHA-256 of the one
//! refresh token currently allowed to rotate; logout and password changes
//! clear it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_users::{PgUserRepository, UserService, auth_handlers, handlers};
//!
//! let service = UserService::new(PgUserRepository::new(db), jwt_auth);
//! let app = Router::new()
//!     .nest("/auth", auth_handlers::router(service.clone()))
//!     .nest("/users", handlers::router(service));
//! ```

pub mod auth_handlers;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, NewUser, RegisterRequest, UpdateProfile,
    UserFilter, UserResponse,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
