use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, CurrentUser, MessageResponse, ValidatedJson, extract_bearer_token,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "auth";

#[derive(OpenApi)]
#[openapi(
    paths(register, login, refresh, logout),
    components(
        schemas(RegisterRequest, LoginRequest, AuthResponse, MessageResponse),
        responses(
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Registration, login and token refresh"))
)]
pub struct ApiDoc;

pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .with_state(Arc::new(service))
}

/// Create a customer account
#[utoipa::path(
    post,
    path = "/register",
    tag = TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let response = service.register(input).await?;

    AuditEvent::new(
        Some(response.user.id),
        "user.register",
        Some(format!("user:{}", response.user.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .log();

    Ok((StatusCode::CREATED, Json(response)))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<AuthResponse>> {
    match service.login(input).await {
        Ok(response) => {
            AuditEvent::new(
                Some(response.user.id),
                "user.login",
                Some(format!("user:{}", response.user.id)),
                AuditOutcome::Success,
            )
            .with_request(&headers)
            .log();
            Ok(Json(response))
        }
        Err(err) => {
            if matches!(err, UserError::InvalidCredentials) {
                AuditEvent::new(None, "user.login", None, AuditOutcome::Failure)
                    .with_request(&headers)
                    .with_details(json!({ "reason": "invalid_credentials" }))
                    .log();
            }
            Err(err)
        }
    }
}

/// Rotate tokens. Send the refresh token as `Authorization: Bearer <refresh_token>`.
#[utoipa::path(
    post,
    path = "/refresh",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New token pair", body = AuthResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn refresh<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
) -> UserResult<Json<AuthResponse>> {
    let token = extract_bearer_token(&headers).ok_or(UserError::InvalidRefreshToken)?;
    let response = service.refresh(&token).await?;
    Ok(Json(response))
}

/// Revoke the stored refresh token
#[utoipa::path(
    post,
    path = "/logout",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn logout<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    user: CurrentUser,
    headers: HeaderMap,
) -> UserResult<Json<MessageResponse>> {
    service.logout(user.id).await?;

    AuditEvent::new(
        Some(user.id),
        "user.logout",
        Some(format!("user:{}", user.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .log();

    Ok(Json(MessageResponse::new("Successfully logged out")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;
    use serde_json::Value;
    use test_utils::{TestAuth, json_body, request};
    use tower::ServiceExt;

    fn app() -> Router {
        let auth = TestAuth::new();
        let service = UserService::new(InMemoryUserRepository::new(), auth.jwt.clone());
        auth.layer(router(service))
    }

    fn register_body(email: &str) -> Value {
        json!({
            "email": email,
            "password": "Str0ng@Pass",
            "first_name": "Jane",
            "last_name": "Doe"
        })
    }

    #[tokio::test]
    async fn test_register_returns_201_with_tokens() {
        let response = app()
            .oneshot(request(
                "POST",
                "/register",
                None,
                Some(register_body("jane@example.com")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = json_body(response).await;
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 900);
        assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["role"], "customer");
    }

    #[tokio::test]
    async fn test_register_weak_password_is_validation_error() {
        let mut body = register_body("weak@example.com");
        body["password"] = json!("password");

        let response = app()
            .oneshot(request("POST", "/register", None, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = json_body(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"]["password"].is_array());
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let app = app();
        let first = app
            .clone()
            .oneshot(request("POST", "/register", None, Some(register_body("dup@example.com"))))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(request("POST", "/register", None, Some(register_body("dup@example.com"))))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_401() {
        let app = app();
        app.clone()
            .oneshot(request("POST", "/register", None, Some(register_body("login@example.com"))))
            .await
            .unwrap();

        let response = app
            .oneshot(request(
                "POST",
                "/login",
                None,
                Some(json!({ "email": "login@example.com", "password": "Wr0ng@Pass" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = json_body(response).await;
        assert_eq!(body["message"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_refresh_then_logout_flow() {
        let app = app();
        let registered: Value = json_body(
            app.clone()
                .oneshot(request("POST", "/register", None, Some(register_body("flow@example.com"))))
                .await
                .unwrap(),
        )
        .await;
        let refresh_token = registered["refresh_token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request("POST", "/refresh", Some(&refresh_token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let refreshed: Value = json_body(response).await;
        let access_token = refreshed["access_token"].as_str().unwrap().to_string();
        let new_refresh = refreshed["refresh_token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request("POST", "/logout", Some(&access_token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = json_body(response).await;
        assert_eq!(body.message, "Successfully logged out");

        let response = app
            .oneshot(request("POST", "/refresh", Some(&new_refresh), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_without_token() {
        let response = app()
            .oneshot(request("POST", "/refresh", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
