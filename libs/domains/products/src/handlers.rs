use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
};
use axum_helpers::{
    AdminUser, AuditEvent, AuditOutcome, UuidPath, UuidPathPair, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, CreateVariant, ImageInput, Product, ProductDetail, ProductFilter, ProductImage,
    ProductWithImages, UpdateProduct, UpdateVariant, Variant,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const TAG: &str = "products";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        add_variant,
        update_variant,
        delete_variant,
    ),
    components(
        schemas(
            Product,
            ProductImage,
            ProductWithImages,
            ProductDetail,
            Variant,
            ImageInput,
            CreateProduct,
            UpdateProduct,
            CreateVariant,
            UpdateVariant
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Catalog products and variants"))
)]
pub struct ApiDoc;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/{id}/variants", post(add_variant))
        .route(
            "/{id}/variants/{variant_id}",
            patch(update_variant).delete(delete_variant),
        )
        .with_state(Arc::new(service))
}

/// Active products, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ProductFilter),
    responses(
        (status = 200, description = "Products with images", body = Vec<ProductWithImages>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedQuery(filter): ValidatedQuery<ProductFilter>,
) -> ProductResult<Json<Vec<ProductWithImages>>> {
    Ok(Json(service.list_products(filter).await?))
}

/// Create a product with its images (admin)
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductWithImages),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let created = service.create_product(input).await?;

    AuditEvent::new(
        Some(admin.id),
        "product.create",
        Some(format!("product:{}", created.product.id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .with_details(json!({ "sku": created.product.sku, "price": created.product.price }))
    .log();

    Ok((StatusCode::CREATED, Json(created)))
}

/// Product with images, variants, category and rating summary
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ProductDetail>> {
    Ok(Json(service.get_product(id).await?))
}

/// Partial update; `images` replaces the image set (admin)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductWithImages),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<ProductWithImages>> {
    Ok(Json(service.update_product(id, input).await?))
}

/// Delete a product (admin)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id).await?;

    AuditEvent::new(
        Some(admin.id),
        "product.delete",
        Some(format!("product:{}", id)),
        AuditOutcome::Success,
    )
    .with_request(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Add a variant (admin)
#[utoipa::path(
    post,
    path = "/{id}/variants",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = CreateVariant,
    responses(
        (status = 201, description = "Variant created", body = Variant),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn add_variant<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<CreateVariant>,
) -> ProductResult<impl IntoResponse> {
    let variant = service.add_variant(id, input).await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

/// Update a variant of this product (admin)
#[utoipa::path(
    patch,
    path = "/{id}/variants/{variant_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("variant_id" = Uuid, Path, description = "Variant ID")
    ),
    request_body = UpdateVariant,
    responses(
        (status = 200, description = "Variant updated", body = Variant),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn update_variant<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _admin: AdminUser,
    UuidPathPair(id, variant_id): UuidPathPair,
    ValidatedJson(input): ValidatedJson<UpdateVariant>,
) -> ProductResult<Json<Variant>> {
    Ok(Json(service.update_variant(id, variant_id, input).await?))
}

/// Delete a variant of this product (admin)
#[utoipa::path(
    delete,
    path = "/{id}/variants/{variant_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("variant_id" = Uuid, Path, description = "Variant ID")
    ),
    responses(
        (status = 204, description = "Variant deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_variant<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _admin: AdminUser,
    UuidPathPair(id, variant_id): UuidPathPair,
) -> ProductResult<impl IntoResponse> {
    service.delete_variant(id, variant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
