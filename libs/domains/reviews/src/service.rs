use axum_helpers::MessageResponse;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{CreateReview, NewReview, Review, ReviewQuery, UpdateReview};
use crate::repository::ReviewRepository;

pub struct ReviewService<R: ReviewRepository> {
    repository: Arc<R>,
}

impl<R: ReviewRepository> ReviewService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Review a product; verified when the user received it in a delivered order
    pub async fn create_review(&self, user_id: Uuid, input: CreateReview) -> ReviewResult<Review> {
        input
            .validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;

        if !self.repository.product_exists(input.product_id).await? {
            return Err(ReviewError::ProductNotFound);
        }
        if self
            .repository
            .find_by_user_product(user_id, input.product_id)
            .await?
            .is_some()
        {
            return Err(ReviewError::AlreadyReviewed);
        }

        let is_verified = self
            .repository
            .has_delivered(user_id, input.product_id)
            .await?;

        let record = self
            .repository
            .create(NewReview {
                user_id,
                product_id: input.product_id,
                rating: input.rating,
                comment: input.comment,
                is_verified,
            })
            .await?;
        Ok(record.into())
    }

    pub async fn list_reviews(&self, query: ReviewQuery) -> ReviewResult<Vec<Review>> {
        query
            .validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;
        let records = self.repository.list(query).await?;
        Ok(records.into_iter().map(Review::from).collect())
    }

    pub async fn get_review(&self, id: Uuid) -> ReviewResult<Review> {
        self.repository
            .find(id)
            .await?
            .map(Review::from)
            .ok_or(ReviewError::NotFound(id))
    }

    pub async fn update_review(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateReview,
    ) -> ReviewResult<Review> {
        input
            .validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;
        self.repository
            .update(id, user_id, input)
            .await?
            .map(Review::from)
            .ok_or(ReviewError::NotOwned)
    }

    pub async fn delete_review(&self, user_id: Uuid, id: Uuid) -> ReviewResult<MessageResponse> {
        if !self.repository.delete(id, user_id).await? {
            return Err(ReviewError::NotOwned);
        }
        Ok(MessageResponse::new("Review deleted successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewRecord;
    use crate::repository::MockReviewRepository;
    use chrono::Utc;
    use entity::reviews;

    fn record(review: &NewReview) -> ReviewRecord {
        let now = Utc::now().into();
        ReviewRecord {
            review: reviews::Model {
                id: Uuid::new_v4(),
                user_id: review.user_id,
                product_id: review.product_id,
                rating: review.rating,
                comment: review.comment.clone(),
                is_verified: review.is_verified,
                created_at: now,
                updated_at: now,
            },
            author: None,
        }
    }

    fn input(product_id: Uuid) -> CreateReview {
        CreateReview {
            product_id,
            rating: 5,
            comment: Some("Great lamp".into()),
        }
    }

    #[tokio::test]
    async fn test_create_marks_verified_buyers() {
        let mut mock = MockReviewRepository::new();
        mock.expect_product_exists().returning(|_| Ok(true));
        mock.expect_find_by_user_product().returning(|_, _| Ok(None));
        mock.expect_has_delivered().returning(|_, _| Ok(true));
        mock.expect_create()
            .withf(|review| review.is_verified && review.rating == 5)
            .returning(|review| Ok(record(&review)));

        let service = ReviewService::new(mock);
        let review = service
            .create_review(Uuid::new_v4(), input(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(review.is_verified);
    }

    #[tokio::test]
    async fn test_create_for_missing_product() {
        let mut mock = MockReviewRepository::new();
        mock.expect_product_exists().returning(|_| Ok(false));
        mock.expect_create().never();

        let service = ReviewService::new(mock);
        let err = service
            .create_review(Uuid::new_v4(), input(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[tokio::test]
    async fn test_second_review_rejected() {
        let user_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let existing = record(&NewReview {
            user_id,
            product_id,
            rating: 3,
            comment: None,
            is_verified: false,
        })
        .review;

        let mut mock = MockReviewRepository::new();
        mock.expect_product_exists().returning(|_| Ok(true));
        mock.expect_find_by_user_product()
            .returning(move |_, _| Ok(Some(existing.clone())));
        mock.expect_create().never();

        let service = ReviewService::new(mock);
        let err = service
            .create_review(user_id, input(product_id))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You have already reviewed this product");
    }

    #[tokio::test]
    async fn test_update_and_delete_of_foreign_review() {
        let mut mock = MockReviewRepository::new();
        mock.expect_update().returning(|_, _, _| Ok(None));
        mock.expect_delete().returning(|_, _| Ok(false));

        let service = ReviewService::new(mock);
        let err = service
            .update_review(Uuid::new_v4(), Uuid::new_v4(), UpdateReview::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Review not found or unauthorized");

        let err = service
            .delete_review(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::NotOwned));
    }

    #[tokio::test]
    async fn test_invalid_rating_never_reaches_repository() {
        let service = ReviewService::new(MockReviewRepository::new());
        let err = service
            .create_review(
                Uuid::new_v4(),
                CreateReview {
                    product_id: Uuid::new_v4(),
                    rating: 9,
                    comment: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));
    }
}
