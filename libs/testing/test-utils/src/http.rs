//! Helpers for `tower::ServiceExt::oneshot` handler tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use axum_helpers::{JwtAuth, JwtConfig, optional_jwt_auth_middleware};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use uuid::Uuid;

const TEST_SECRET: &str = "handler-test-secret-0123456789abcdefghij";

/// Mints access tokens and wraps routers with the optional auth middleware,
/// the same way the API root does.
#[derive(Clone)]
pub struct TestAuth {
    pub jwt: JwtAuth,
}

impl TestAuth {
    pub fn new() -> Self {
        let config = JwtConfig::new(TEST_SECRET).expect("test secret is long enough");
        Self {
            jwt: JwtAuth::new(&config),
        }
    }

    pub fn token(&self, user_id: Uuid, roles: &[&str]) -> String {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        self.jwt
            .issue_pair(user_id, "tester@example.com", "Tester", &roles)
            .expect("Failed to issue test token")
            .access_token
    }

    pub fn customer(&self, user_id: Uuid) -> String {
        self.token(user_id, &["customer"])
    }

    pub fn admin(&self, user_id: Uuid) -> String {
        self.token(user_id, &["admin"])
    }

    pub fn layer(&self, router: Router) -> Router {
        router.layer(axum::middleware::from_fn_with_state(
            self.jwt.clone(),
            optional_jwt_auth_middleware,
        ))
    }
}

impl Default for TestAuth {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a request with an optional bearer token and optional JSON body.
pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("valid request"),
        None => builder.body(Body::empty()).expect("valid request"),
    }
}

pub async fn json_body<T: DeserializeOwned>(response: Response) -> T {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not the expected JSON")
}
