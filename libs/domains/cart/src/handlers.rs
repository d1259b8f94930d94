use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use axum_helpers::{
    CurrentUser, MessageResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CartResult;
use crate::models::{AddToCart, Cart, CartItem, UpdateCartItem};
use crate::repository::CartRepository;
use crate::service::CartService;

pub const TAG: &str = "cart";

#[derive(OpenApi)]
#[openapi(
    paths(get_cart, add_item, update_item, remove_item, clear_cart),
    components(
        schemas(Cart, CartItem, AddToCart, UpdateCartItem, MessageResponse),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Shopping cart of the current user"))
)]
pub struct ApiDoc;

pub fn router<R: CartRepository + 'static>(service: CartService<R>) -> Router {
    Router::new()
        .route("/", get(get_cart))
        .route("/add", post(add_item))
        .route("/items/{id}", patch(update_item))
        .route("/remove/{id}", delete(remove_item))
        .route("/clear", delete(clear_cart))
        .with_state(Arc::new(service))
}

/// Current cart, created on first access
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active cart", body = Cart),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn get_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: CurrentUser,
) -> CartResult<Json<Cart>> {
    Ok(Json(service.get_cart(user.id).await?))
}

/// Add a product or variant to the cart
#[utoipa::path(
    post,
    path = "/add",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = AddToCart,
    responses(
        (status = 201, description = "Cart after the change", body = Cart),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn add_item<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<AddToCart>,
) -> CartResult<impl IntoResponse> {
    let cart = service.add_item(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// Change the quantity of a cart line
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Cart item ID")),
    request_body = UpdateCartItem,
    responses(
        (status = 200, description = "Cart after the change", body = Cart),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_item<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCartItem>,
) -> CartResult<Json<Cart>> {
    Ok(Json(service.update_item(user.id, id, input).await?))
}

/// Remove a line from the cart
#[utoipa::path(
    delete,
    path = "/remove/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "Cart after the change", body = Cart),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn remove_item<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> CartResult<Json<Cart>> {
    Ok(Json(service.remove_item(user.id, id).await?))
}

/// Remove every line from the cart
#[utoipa::path(
    delete,
    path = "/clear",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart cleared", body = MessageResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn clear_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: CurrentUser,
) -> CartResult<Json<MessageResponse>> {
    Ok(Json(service.clear_cart(user.id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCartRepository;
    use serde_json::{Value, json};
    use test_utils::{TestAuth, json_body, request};
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_cart_requires_token() {
        let auth = TestAuth::new();
        let app = auth.layer(router(CartService::new(MockCartRepository::new())));

        let response = app.oneshot(request("GET", "/", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_add_rejects_zero_quantity() {
        let auth = TestAuth::new();
        let app = auth.layer(router(CartService::new(MockCartRepository::new())));
        let token = auth.customer(Uuid::new_v4());

        let response = app
            .oneshot(request(
                "POST",
                "/add",
                Some(&token),
                Some(json!({ "product_id": Uuid::new_v4(), "quantity": 0 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_clear_without_cart() {
        let auth = TestAuth::new();
        let mut mock = MockCartRepository::new();
        mock.expect_active_cart().returning(|_| Ok(None));
        let app = auth.layer(router(CartService::new(mock)));
        let token = auth.customer(Uuid::new_v4());

        let response = app
            .oneshot(request("DELETE", "/clear", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_body(response).await;
        assert_eq!(body["message"], "Cart is already empty");
    }

    #[tokio::test]
    async fn test_remove_unknown_item_message() {
        let auth = TestAuth::new();
        let mut mock = MockCartRepository::new();
        mock.expect_active_cart().returning(|_| Ok(None));
        let app = auth.layer(router(CartService::new(mock)));
        let token = auth.customer(Uuid::new_v4());

        let response = app
            .oneshot(request(
                "DELETE",
                &format!("/remove/{}", Uuid::new_v4()),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = json_body(response).await;
        assert_eq!(body["message"], "Cart not found");
    }
}
