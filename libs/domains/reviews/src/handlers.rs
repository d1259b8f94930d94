use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    CurrentUser, MessageResponse, UuidPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ReviewResult;
use crate::models::{CreateReview, Review, ReviewQuery, UpdateReview};
use crate::repository::ReviewRepository;
use crate::service::ReviewService;

pub const TAG: &str = "reviews";

#[derive(OpenApi)]
#[openapi(
    paths(list_reviews, create_review, get_review, update_review, delete_review),
    components(
        schemas(Review, CreateReview, UpdateReview, MessageResponse),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Product reviews"))
)]
pub struct ApiDoc;

pub fn router<R: ReviewRepository + 'static>(service: ReviewService<R>) -> Router {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).patch(update_review).delete(delete_review),
        )
        .with_state(Arc::new(service))
}

/// Reviews, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ReviewQuery),
    responses(
        (status = 200, description = "Reviews", body = Vec<Review>),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn list_reviews<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ReviewQuery>,
) -> ReviewResult<Json<Vec<Review>>> {
    Ok(Json(service.list_reviews(query).await?))
}

/// Review a product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn create_review<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateReview>,
) -> ReviewResult<impl IntoResponse> {
    let review = service.create_review(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review found", body = Review),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_review<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<Review>> {
    Ok(Json(service.get_review(id).await?))
}

/// Edit your own review
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_review<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateReview>,
) -> ReviewResult<Json<Review>> {
    Ok(Json(service.update_review(user.id, id, input).await?))
}

/// Delete your own review
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_review<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<MessageResponse>> {
    Ok(Json(service.delete_review(user.id, id).await?))
}
