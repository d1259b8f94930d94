use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use axum_helpers::{
    CurrentUser, UuidPath,
    errors::responses::{
        BadRequestUuidResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::WishlistResult;
use crate::models::{ToggleAction, ToggleResponse, WishlistItem, WishlistProduct};
use crate::repository::WishlistRepository;
use crate::service::WishlistService;

pub const TAG: &str = "wishlist";

#[derive(OpenApi)]
#[openapi(
    paths(list_wishlist, toggle_wishlist, remove_from_wishlist),
    components(
        schemas(WishlistItem, WishlistProduct, ToggleResponse, ToggleAction),
        responses(
            BadRequestUuidResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Saved products"))
)]
pub struct ApiDoc;

pub fn router<R: WishlistRepository + 'static>(service: WishlistService<R>) -> Router {
    Router::new()
        .route("/", get(list_wishlist))
        .route("/toggle/{product_id}", post(toggle_wishlist))
        .route("/{id}", delete(remove_from_wishlist))
        .with_state(Arc::new(service))
}

/// The current user's wishlist, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wishlist", body = Vec<WishlistItem>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_wishlist<R: WishlistRepository>(
    State(service): State<Arc<WishlistService<R>>>,
    user: CurrentUser,
) -> WishlistResult<Json<Vec<WishlistItem>>> {
    Ok(Json(service.list(user.id).await?))
}

/// Add or remove a product
#[utoipa::path(
    post,
    path = "/toggle/{product_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Added or removed", body = ToggleResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn toggle_wishlist<R: WishlistRepository>(
    State(service): State<Arc<WishlistService<R>>>,
    user: CurrentUser,
    UuidPath(product_id): UuidPath,
) -> WishlistResult<Json<ToggleResponse>> {
    Ok(Json(service.toggle(user.id, product_id).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Wishlist item ID")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn remove_from_wishlist<R: WishlistRepository>(
    State(service): State<Arc<WishlistService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> WishlistResult<StatusCode> {
    service.remove(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
