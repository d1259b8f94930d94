use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use entity::coupons;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use crate::error::{CouponError, CouponResult};
use crate::models::{CreateCoupon, UpdateCoupon};
use crate::repository::CouponRepository;

pub struct PgCouponRepository {
    base: BaseRepository<coupons::Entity>,
}

impl PgCouponRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn map_write_error(err: DbErr, code: &str) -> CouponError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => CouponError::DuplicateCode(code.to_string()),
        _ => err.into(),
    }
}

#[async_trait]
impl CouponRepository for PgCouponRepository {
    async fn create(&self, input: CreateCoupon) -> CouponResult<coupons::Model> {
        let now = Utc::now().into();
        let code = input.code.clone();

        let model = coupons::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code),
            coupon_type: Set(input.coupon_type),
            value: Set(input.value),
            min_amount: Set(input.min_amount),
            max_discount: Set(input.max_discount),
            usage_limit: Set(input.usage_limit),
            used_count: Set(0),
            expires_at: Set(input.expires_at.map(Into::into)),
            is_active: Set(input.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.base.db())
        .await
        .map_err(|e| map_write_error(e, &code))?;

        tracing::info!(coupon_id = %model.id, code = %model.code, "Created coupon");
        Ok(model)
    }

    async fn find_by_id(&self, id: Uuid) -> CouponResult<Option<coupons::Model>> {
        Ok(self.base.find_by_id(id).await?)
    }

    async fn find_by_code(&self, code: &str) -> CouponResult<Option<coupons::Model>> {
        let model = coupons::Entity::find()
            .filter(coupons::Column::Code.eq(code))
            .one(self.base.db())
            .await?;
        Ok(model)
    }

    async fn list(&self) -> CouponResult<Vec<coupons::Model>> {
        let models = coupons::Entity::find()
            .order_by_desc(coupons::Column::CreatedAt)
            .all(self.base.db())
            .await?;
        Ok(models)
    }

    async fn update(&self, id: Uuid, input: UpdateCoupon) -> CouponResult<coupons::Model> {
        let existing = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(CouponError::NotFound(id))?;
        let code = input.code.clone().unwrap_or_else(|| existing.code.clone());
        let mut active = existing.into_active_model();

        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(coupon_type) = input.coupon_type {
            active.coupon_type = Set(coupon_type);
        }
        if let Some(value) = input.value {
            active.value = Set(value);
        }
        if let Some(min_amount) = input.min_amount {
            active.min_amount = Set(Some(min_amount));
        }
        if let Some(max_discount) = input.max_discount {
            active.max_discount = Set(Some(max_discount));
        }
        if let Some(usage_limit) = input.usage_limit {
            active.usage_limit = Set(Some(usage_limit));
        }
        if let Some(expires_at) = input.expires_at {
            active.expires_at = Set(Some(expires_at.into()));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let model = active
            .update(self.base.db())
            .await
            .map_err(|e| map_write_error(e, &code))?;

        tracing::info!(coupon_id = %id, "Updated coupon");
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> CouponResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;
        if rows_affected > 0 {
            tracing::info!(coupon_id = %id, "Deleted coupon");
        }
        Ok(rows_affected > 0)
    }
}
