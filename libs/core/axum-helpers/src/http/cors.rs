use axum::http::{HeaderValue, Method, header};
use core_config::{ConfigError, FromEnv, env_required};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Allowed browser origins.
///
/// `CORS_ALLOWED_ORIGIN` is required and takes a comma-separated list, e.g.
/// `http://localhost:3000,https://shop.example.com`. A single `*` allows any
/// origin without credentials.
#[derive(Clone, Debug)]
pub enum CorsConfig {
    Any,
    Origins(Vec<HeaderValue>),
}

impl CorsConfig {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim() == "*" {
            return Ok(CorsConfig::Any);
        }

        let origins = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(HeaderValue::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: e.to_string(),
            })?;

        if origins.is_empty() {
            return Err(ConfigError::Invalid {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: "cannot be empty".to_string(),
            });
        }

        Ok(CorsConfig::Origins(origins))
    }
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::parse(&env_required("CORS_ALLOWED_ORIGIN")?)
    }
}

/// CORS layer for the API: common methods, JSON and bearer headers, 1 hour max age.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    match config {
        CorsConfig::Any => layer.allow_origin(Any),
        CorsConfig::Origins(origins) => layer
            .allow_origin(AllowOrigin::list(origins.clone()))
            .allow_credentials(true),
    }
}
