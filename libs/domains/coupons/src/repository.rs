use async_trait::async_trait;
use entity::coupons;
use uuid::Uuid;

use crate::error::CouponResult;
use crate::models::{CreateCoupon, UpdateCoupon};

/// Repository trait for coupon persistence
///
/// Codes reach the repository already normalized.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponRepository: Send + Sync {
    async fn create(&self, input: CreateCoupon) -> CouponResult<coupons::Model>;

    async fn find_by_id(&self, id: Uuid) -> CouponResult<Option<coupons::Model>>;

    async fn find_by_code(&self, code: &str) -> CouponResult<Option<coupons::Model>>;

    /// Newest first
    async fn list(&self) -> CouponResult<Vec<coupons::Model>>;

    async fn update(&self, id: Uuid, input: UpdateCoupon) -> CouponResult<coupons::Model>;

    /// Delete a coupon, returns false when absent
    async fn delete(&self, id: Uuid) -> CouponResult<bool>;
}
