use super::jwt::{JwtAuth, TokenType};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bearer token from the Authorization header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid access token; inserts `JwtClaims` otherwise.
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer_token(&headers) else {
        tracing::debug!("No bearer token in Authorization header");
        return AppError::Unauthorized("No token provided".to_string()).into_response();
    };

    match auth.verify(&token, TokenType::Access) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string()).into_response()
        }
    }
}

/// Attaches `JwtClaims` when a valid access token is present and never rejects.
///
/// Applied once at the API root; handlers opt in to authentication through
/// the `CurrentUser` and `AdminUser` extractors.
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer_token(&headers) {
        match auth.verify(&token, TokenType::Access) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(e) => tracing::debug!("Ignoring invalid JWT: {}", e),
        }
    }

    next.run(request).await
}
