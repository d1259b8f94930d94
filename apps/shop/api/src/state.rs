//! Shared application state.

use axum_helpers::JwtAuth;
use database::postgres::DatabaseConnection;

/// Cloned into every domain router at startup; clones share the pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
    pub jwt: JwtAuth,
}
