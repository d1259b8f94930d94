use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch},
};
use axum_helpers::{
    AdminUser, AuditEvent, AuditOutcome, CurrentUser, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::PaymentResult;
use crate::models::{CreatePayment, Payment, UpdatePaymentStatus};
use crate::repository::PaymentRepository;
use crate::service::PaymentService;

pub const TAG: &str = "payments";

#[derive(OpenApi)]
#[openapi(
    paths(create_payment, list_payments, get_payment, update_payment_status),
    components(
        schemas(Payment, CreatePayment, UpdatePaymentStatus),
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
    tags((name = TAG, description = "Order payments"))
)]
pub struct ApiDoc;

pub fn router<R: PaymentRepository + 'static>(service: PaymentService<R>) -> Router {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route("/{id}", get(get_payment))
        .route("/{id}/status", patch(update_payment_status))
        .with_state(Arc::new(service))
}

/// Start a payment for an order
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = CreatePayment,
    responses(
        (status = 201, description = "Payment created", body = Payment),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn create_payment<R: PaymentRepository>(
    State(service): State<Arc<PaymentService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreatePayment>,
) -> PaymentResult<impl IntoResponse> {
    let payment = service.create_payment(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Payments of the current user, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payments", body = Vec<Payment>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_payments<R: PaymentRepository>(
    State(service): State<Arc<PaymentService<R>>>,
    user: CurrentUser,
) -> PaymentResult<Json<Vec<Payment>>> {
    Ok(Json(service.list_my_payments(user.id).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment found", body = Payment),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_payment<R: PaymentRepository>(
    State(service): State<Arc<PaymentService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> PaymentResult<Json<Payment>> {
    Ok(Json(service.get_my_payment(user.id, id).await?))
}

/// Record a provider outcome (admin)
///
/// Completing the payment of a pending order moves the order to processing.
#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = UpdatePaymentStatus,
    responses(
        (status = 200, description = "Payment updated", body = Payment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_payment_status<R: PaymentRepository>(
    State(service): State<Arc<PaymentService<R>>>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdatePaymentStatus>,
) -> PaymentResult<Json<Payment>> {
    let payment = service.update_status(id, input).await?;

    AuditEvent::new(
        Some(admin.id),
        "payment.status",
        Some(format!("payment:{}", id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(json!({ "status": payment.status, "order_id": payment.order_id }))
    .log();

    Ok(Json(payment))
}
