use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch},
};
use axum_helpers::{
    AdminUser, AuditEvent, AuditOutcome, CurrentUser, MessageResponse, UuidPath, ValidatedJson,
    ValidatedQuery,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{ChangePasswordRequest, UpdateProfile, UserFilter, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

#[derive(OpenApi)]
#[openapi(
    paths(get_me, update_me, change_password, list_users, get_user, delete_user),
    components(
        schemas(UserResponse, UpdateProfile, ChangePasswordRequest, MessageResponse),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Profile and user administration"))
)]
pub struct ApiDoc;

/// Profile routes for the caller plus admin user management
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_me).patch(update_me))
        .route("/me/password", patch(change_password))
        .route("/{id}", get(get_user).delete(delete_user))
        .with_state(Arc::new(service))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/me",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_me<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    user: CurrentUser,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.get_profile(user.id).await?))
}

/// Update name or phone
#[utoipa::path(
    patch,
    path = "/me",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_me<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<UpdateProfile>,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.update_profile(user.id, input).await?))
}

/// Change password. Signs out other sessions by revoking the refresh token.
#[utoipa::path(
    patch,
    path = "/me/password",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn change_password<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    user: CurrentUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> UserResult<Json<MessageResponse>> {
    let result = service.change_password(user.id, input).await;

    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::new(
        Some(user.id),
        "user.change_password",
        Some(format!("user:{}", user.id)),
        outcome,
    )
    .with_request(&headers)
    .log();

    result?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// List users (admin)
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(UserFilter),
    responses(
        (status = 200, description = "Users, newest first", body = Vec<UserResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    _admin: AdminUser,
    ValidatedQuery(filter): ValidatedQuery<UserFilter>,
) -> UserResult<Json<Vec<UserResponse>>> {
    Ok(Json(service.list_users(filter).await?))
}

/// Get a user by ID (admin)
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.get_user(id).await?))
}

/// Delete a user (admin)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> UserResult<impl IntoResponse> {
    service.delete_user(id).await?;

    AuditEvent::new(
        Some(admin.id),
        "user.delete",
        Some(format!("user:{}", id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}
