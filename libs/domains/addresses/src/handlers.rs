use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use axum_helpers::{
    CurrentUser, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::AddressResult;
use crate::models::{Address, CreateAddress, UpdateAddress};
use crate::repository::AddressRepository;
use crate::service::AddressService;

pub const TAG: &str = "addresses";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_addresses,
        create_address,
        get_address,
        update_address,
        set_default_address,
        delete_address
    ),
    components(
        schemas(Address, CreateAddress, UpdateAddress),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Shipping addresses"))
)]
pub struct ApiDoc;

pub fn router<R: AddressRepository + 'static>(service: AddressService<R>) -> Router {
    Router::new()
        .route("/", get(list_addresses).post(create_address))
        .route(
            "/{id}",
            get(get_address)
                .patch(update_address)
                .delete(delete_address),
        )
        .route("/{id}/default", patch(set_default_address))
        .with_state(Arc::new(service))
}

/// The current user's addresses, default first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Addresses", body = Vec<Address>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_addresses<R: AddressRepository>(
    State(service): State<Arc<AddressService<R>>>,
    user: CurrentUser,
) -> AddressResult<Json<Vec<Address>>> {
    Ok(Json(service.list_addresses(user.id).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = CreateAddress,
    responses(
        (status = 201, description = "Address created", body = Address),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn create_address<R: AddressRepository>(
    State(service): State<Arc<AddressService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateAddress>,
) -> AddressResult<impl IntoResponse> {
    let address = service.create_address(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address found", body = Address),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_address<R: AddressRepository>(
    State(service): State<Arc<AddressService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> AddressResult<Json<Address>> {
    Ok(Json(service.get_address(user.id, id).await?))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    request_body = UpdateAddress,
    responses(
        (status = 200, description = "Address updated", body = Address),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_address<R: AddressRepository>(
    State(service): State<Arc<AddressService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateAddress>,
) -> AddressResult<Json<Address>> {
    Ok(Json(service.update_address(user.id, id, input).await?))
}

/// Make this the default shipping address
#[utoipa::path(
    patch,
    path = "/{id}/default",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Default changed", body = Address),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn set_default_address<R: AddressRepository>(
    State(service): State<Arc<AddressService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> AddressResult<Json<Address>> {
    Ok(Json(service.set_default(user.id, id).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 204, description = "Address deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_address<R: AddressRepository>(
    State(service): State<Arc<AddressService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> AddressResult<StatusCode> {
    service.delete_address(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
