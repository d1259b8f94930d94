use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use entity::{OrderStatus, order_items, orders, products, reviews, users};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{NewReview, ReviewQuery, ReviewRecord, UpdateReview};
use crate::repository::ReviewRepository;

pub struct PgReviewRepository {
    base: BaseRepository<reviews::Entity>,
}

impl PgReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }

    async fn with_author(&self, review: reviews::Model) -> ReviewResult<ReviewRecord> {
        let author = users::Entity::find_by_id(review.user_id)
            .one(self.db())
            .await?;
        Ok(ReviewRecord { review, author })
    }
}

fn map_insert_error(err: DbErr) -> ReviewError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ReviewError::AlreadyReviewed,
        _ => err.into(),
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn product_exists(&self, product_id: Uuid) -> ReviewResult<bool> {
        let count = products::Entity::find_by_id(product_id)
            .count(self.db())
            .await?;
        Ok(count > 0)
    }

    async fn find_by_user_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> ReviewResult<Option<reviews::Model>> {
        let review = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::ProductId.eq(product_id))
            .one(self.db())
            .await?;
        Ok(review)
    }

    async fn has_delivered(&self, user_id: Uuid, product_id: Uuid) -> ReviewResult<bool> {
        let delivered: Vec<Uuid> = orders::Entity::find()
            .select_only()
            .column(orders::Column::Id)
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::Status.eq(OrderStatus::Delivered))
            .into_tuple()
            .all(self.db())
            .await?;
        if delivered.is_empty() {
            return Ok(false);
        }

        let count = order_items::Entity::find()
            .filter(order_items::Column::OrderId.is_in(delivered))
            .filter(order_items::Column::ProductId.eq(product_id))
            .count(self.db())
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, review: NewReview) -> ReviewResult<ReviewRecord> {
        let now = Utc::now().into();
        let model = reviews::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(review.user_id),
            product_id: Set(review.product_id),
            rating: Set(review.rating),
            comment: Set(review.comment),
            is_verified: Set(review.is_verified),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db())
        .await
        .map_err(map_insert_error)?;

        tracing::info!(
            review_id = %model.id,
            product_id = %model.product_id,
            verified = model.is_verified,
            "Created review"
        );
        self.with_author(model).await
    }

    async fn list(&self, query: ReviewQuery) -> ReviewResult<Vec<ReviewRecord>> {
        let mut select = reviews::Entity::find().find_also_related(users::Entity);
        if let Some(product_id) = query.product_id {
            select = select.filter(reviews::Column::ProductId.eq(product_id));
        }

        let rows = select
            .order_by_desc(reviews::Column::CreatedAt)
            .offset(query.offset)
            .limit(query.limit)
            .all(self.db())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(review, author)| ReviewRecord { review, author })
            .collect())
    }

    async fn find(&self, id: Uuid) -> ReviewResult<Option<ReviewRecord>> {
        let row = reviews::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(self.db())
            .await?;
        Ok(row.map(|(review, author)| ReviewRecord { review, author }))
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: UpdateReview,
    ) -> ReviewResult<Option<ReviewRecord>> {
        let Some(existing) = reviews::Entity::find_by_id(id)
            .filter(reviews::Column::UserId.eq(user_id))
            .one(self.db())
            .await?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(rating) = input.rating {
            active.rating = Set(rating);
        }
        if let Some(comment) = input.comment {
            active.comment = Set(Some(comment));
        }
        active.updated_at = Set(Utc::now().into());
        let model = active.update(self.db()).await?;

        tracing::info!(review_id = %id, "Updated review");
        Ok(Some(self.with_author(model).await?))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> ReviewResult<bool> {
        let result = reviews::Entity::delete_many()
            .filter(reviews::Column::Id.eq(id))
            .filter(reviews::Column::UserId.eq(user_id))
            .exec(self.db())
            .await?;
        if result.rows_affected > 0 {
            tracing::info!(review_id = %id, "Deleted review");
        }
        Ok(result.rows_affected > 0)
    }
}
