//! Stateless JWT authentication.
//!
//! - [`JwtAuth`] issues and verifies HS256 access/refresh tokens.
//! - [`optional_jwt_auth_middleware`] attaches [`JwtClaims`] to requests that
//!   carry a valid access token; [`jwt_auth_middleware`] rejects the rest.
//! - [`CurrentUser`] and [`AdminUser`] pull the claims back out in handlers and
//!   enforce authentication or the `admin` role.
//!
//! ```ignore
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let app = api_routes.layer(axum::middleware::from_fn_with_state(
//!     auth.clone(),
//!     optional_jwt_auth_middleware,
//! ));
//!
//! async fn me(user: CurrentUser) -> String {
//!     user.id.to_string()
//! }
//! ```

pub mod config;
pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use extractor::{ADMIN_ROLE, AdminUser, CurrentUser};
pub use jwt::{JwtAuth, JwtClaims, TokenPair, TokenType};
pub use middleware::{extract_bearer_token, jwt_auth_middleware, optional_jwt_auth_middleware};
