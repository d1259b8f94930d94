//! # Axum Helpers
//!
//! Shared HTTP plumbing for the shop API crates.
//!
//! - **[`auth`]**: stateless JWT issuing/verification, auth middleware, `CurrentUser`/`AdminUser` extractors
//! - **[`server`]**: router assembly with OpenAPI UIs, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `AppError` and the structured error body
//! - **[`extractors`]**: `UuidPath`, `ValidatedJson`, `ValidatedQuery`
//! - **[`audit`]**: audit logging for security-relevant actions
//! - **[`validation`]**: custom `validator` functions for money fields

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod message;
pub mod server;
pub mod validation;

pub use auth::{
    ADMIN_ROLE, AdminUser, CurrentUser, JwtAuth, JwtClaims, JwtConfig, TokenPair, TokenType,
    extract_bearer_token, jwt_auth_middleware, optional_jwt_auth_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{CorsConfig, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{UuidPath, UuidPathPair, ValidatedJson, ValidatedQuery};

pub use message::MessageResponse;

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
