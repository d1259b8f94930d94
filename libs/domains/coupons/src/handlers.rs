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
        ConflictResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CouponResult;
use crate::models::{Coupon, CouponValidation, CreateCoupon, UpdateCoupon, ValidateCouponQuery};
use crate::repository::CouponRepository;
use crate::service::CouponService;

pub const TAG: &str = "coupons";

#[derive(OpenApi)]
#[openapi(
    paths(list_coupons, create_coupon, validate_coupon, update_coupon, delete_coupon),
    components(
        schemas(Coupon, CouponValidation, CreateCoupon, UpdateCoupon, MessageResponse),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Discount coupons"))
)]
pub struct ApiDoc;

pub fn router<R: CouponRepository + 'static>(service: CouponService<R>) -> Router {
    Router::new()
        .route("/", get(list_coupons).post(create_coupon))
        .route("/validate", get(validate_coupon))
        .route("/{id}", patch(update_coupon).delete(delete_coupon))
        .with_state(Arc::new(service))
}

/// All coupons (admin)
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Coupons, newest first", body = Vec<Coupon>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn list_coupons<R: CouponRepository>(
    State(service): State<Arc<CouponService<R>>>,
    _admin: AdminUser,
) -> CouponResult<Json<Vec<Coupon>>> {
    Ok(Json(service.list_coupons().await?))
}

/// Create a coupon (admin)
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = CreateCoupon,
    responses(
        (status = 201, description = "Coupon created", body = Coupon),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn create_coupon<R: CouponRepository>(
    State(service): State<Arc<CouponService<R>>>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateCoupon>,
) -> CouponResult<impl IntoResponse> {
    let coupon = service.create_coupon(input).await?;

    AuditEvent::new(
        Some(admin.id),
        "coupon.create",
        Some(format!("coupon:{}", coupon.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(serde_json::json!({ "code": coupon.code }))
    .log();

    Ok((StatusCode::CREATED, Json(coupon)))
}

/// Check a coupon code against an order total
#[utoipa::path(
    get,
    path = "/validate",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(ValidateCouponQuery),
    responses(
        (status = 200, description = "Coupon applies", body = CouponValidation),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn validate_coupon<R: CouponRepository>(
    State(service): State<Arc<CouponService<R>>>,
    _user: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<ValidateCouponQuery>,
) -> CouponResult<Json<CouponValidation>> {
    Ok(Json(service.validate_coupon(&query.code, query.total).await?))
}

/// Update a coupon (admin)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Coupon ID")),
    request_body = UpdateCoupon,
    responses(
        (status = 200, description = "Coupon updated", body = Coupon),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn update_coupon<R: CouponRepository>(
    State(service): State<Arc<CouponService<R>>>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCoupon>,
) -> CouponResult<Json<Coupon>> {
    Ok(Json(service.update_coupon(id, input).await?))
}

/// Delete a coupon (admin)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Coupon ID")),
    responses(
        (status = 200, description = "Coupon deleted", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_coupon<R: CouponRepository>(
    State(service): State<Arc<CouponService<R>>>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> CouponResult<Json<MessageResponse>> {
    let message = service.delete_coupon(id).await?;

    AuditEvent::new(
        Some(admin.id),
        "coupon.delete",
        Some(format!("coupon:{}", id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .log();

    Ok(Json(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCouponRepository;
    use serde_json::Value;
    use test_utils::{TestAuth, json_body, request};
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_list_requires_admin() {
        let auth = TestAuth::new();
        let app = auth.layer(router(CouponService::new(MockCouponRepository::new())));

        let response = app
            .clone()
            .oneshot(request("GET", "/", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let token = auth.customer(Uuid::new_v4());
        let response = app
            .oneshot(request("GET", "/", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_validate_unknown_code_is_bad_request() {
        let auth = TestAuth::new();
        let mut mock = MockCouponRepository::new();
        mock.expect_find_by_code().returning(|_| Ok(None));
        let app = auth.layer(router(CouponService::new(mock)));
        let token = auth.customer(Uuid::new_v4());

        let response = app
            .oneshot(request(
                "GET",
                "/validate?code=nothing&total=50.00",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = json_body(response).await;
        assert_eq!(body["message"], "Invalid coupon code");
    }

    #[tokio::test]
    async fn test_delete_returns_message() {
        let auth = TestAuth::new();
        let mut mock = MockCouponRepository::new();
        mock.expect_delete().returning(|_| Ok(true));
        let app = auth.layer(router(CouponService::new(mock)));
        let token = auth.admin(Uuid::new_v4());

        let response = app
            .oneshot(request(
                "DELETE",
                &format!("/{}", Uuid::new_v4()),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_body(response).await;
        assert_eq!(body["message"], "Coupon deleted");
    }
}
