use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
};
use axum_helpers::{
    AdminUser, AuditEvent, AuditOutcome, CurrentUser, UuidPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::OrderResult;
use crate::models::{
    Checkout, Order, OrderItem, OrderQuery, Paginated, PaymentSummary, UpdateOrderStatus,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

pub const TAG: &str = "orders";

#[derive(OpenApi)]
#[openapi(
    paths(checkout, list_my_orders, list_all_orders, get_order, cancel_order, update_status),
    components(
        schemas(
            Order,
            OrderItem,
            PaymentSummary,
            Paginated<Order>,
            Checkout,
            UpdateOrderStatus
        ),
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
    tags((name = TAG, description = "Checkout and order history"))
)]
pub struct ApiDoc;

pub fn router<R: OrderRepository + 'static>(service: OrderService<R>) -> Router {
    Router::new()
        .route("/", get(list_my_orders).post(checkout))
        .route("/admin/all", get(list_all_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/cancel", post(cancel_order))
        .route("/{id}/status", patch(update_status))
        .with_state(Arc::new(service))
}

/// Check out the current cart
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = Checkout,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn checkout<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    user: CurrentUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<Checkout>,
) -> OrderResult<impl IntoResponse> {
    let order = match service.checkout(user.id, input).await {
        Ok(order) => order,
        Err(err) => {
            AuditEvent::new(Some(user.id), "order.checkout", None, AuditOutcome::Failure)
                .with_request(&headers)
                .with_details(json!({ "reason": err.to_string() }))
                .log();
            return Err(err);
        }
    };

    AuditEvent::new(
        Some(user.id),
        "order.checkout",
        Some(format!("order:{}", order.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(json!({
        "order_number": order.order_number,
        "total": order.total_amount,
        "coupon": order.coupon_code,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(order)))
}

/// Orders of the current user, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(OrderQuery),
    responses(
        (status = 200, description = "Page of orders", body = Paginated<Order>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_my_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    user: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<OrderQuery>,
) -> OrderResult<Json<Paginated<Order>>> {
    Ok(Json(service.list_my_orders(user.id, query).await?))
}

/// Orders of every user (admin)
#[utoipa::path(
    get,
    path = "/admin/all",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(OrderQuery),
    responses(
        (status = 200, description = "Page of orders", body = Paginated<Order>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn list_all_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    _admin: AdminUser,
    ValidatedQuery(query): ValidatedQuery<OrderQuery>,
) -> OrderResult<Json<Paginated<Order>>> {
    Ok(Json(service.list_all_orders(query).await?))
}

/// One order of the current user
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<Order>> {
    Ok(Json(service.get_my_order(user.id, id).await?))
}

/// Cancel a pending order and put its stock back
#[utoipa::path(
    post,
    path = "/{id}/cancel",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled", body = Order),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn cancel_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    user: CurrentUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<Order>> {
    let result = service.cancel_order(user.id, id).await;

    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::new(Some(user.id), "order.cancel", Some(format!("order:{}", id)), outcome)
        .with_request(&headers)
        .log();

    Ok(Json(result?))
}

/// Change an order's status (admin)
#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatus,
    responses(
        (status = 200, description = "Status updated", body = Order),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_status<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrderStatus>,
) -> OrderResult<Json<Order>> {
    let status = input.status;
    let order = service.update_status(id, input).await?;

    AuditEvent::new(
        Some(admin.id),
        "order.status",
        Some(format!("order:{}", id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(json!({ "status": status }))
    .log();

    Ok(Json(order))
}
