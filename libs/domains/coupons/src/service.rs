use axum_helpers::MessageResponse;
use chrono::Utc;
use entity::CouponType;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CouponError, CouponResult};
use crate::models::{Coupon, CouponValidation, CreateCoupon, UpdateCoupon, normalize_code};
use crate::repository::CouponRepository;
use crate::rules::{check_usable, discount_for};

pub struct CouponService<R: CouponRepository> {
    repository: Arc<R>,
}

impl<R: CouponRepository> CouponService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_coupon(&self, mut input: CreateCoupon) -> CouponResult<Coupon> {
        input
            .validate()
            .map_err(|e| CouponError::Validation(e.to_string()))?;
        ensure_percentage_in_range(input.coupon_type, input.value)?;

        input.code = normalize_code(&input.code);
        if self.repository.find_by_code(&input.code).await?.is_some() {
            return Err(CouponError::DuplicateCode(input.code));
        }

        Ok(self.repository.create(input).await?.into())
    }

    /// All coupons, newest first
    pub async fn list_coupons(&self) -> CouponResult<Vec<Coupon>> {
        let coupons = self.repository.list().await?;
        Ok(coupons.into_iter().map(Coupon::from).collect())
    }

    /// Check a code against an order total and price the discount
    pub async fn validate_coupon(&self, code: &str, total: Decimal) -> CouponResult<CouponValidation> {
        let coupon = self
            .repository
            .find_by_code(&normalize_code(code))
            .await?
            .ok_or(CouponError::InvalidCode)?;

        if let Err(err) = check_usable(&coupon, total, Utc::now()) {
            tracing::warn!(code = %coupon.code, error = %err, "Coupon rejected");
            return Err(err);
        }

        let discount = discount_for(&coupon, total);
        Ok(CouponValidation {
            coupon: coupon.into(),
            discount,
        })
    }

    pub async fn update_coupon(&self, id: Uuid, mut input: UpdateCoupon) -> CouponResult<Coupon> {
        input
            .validate()
            .map_err(|e| CouponError::Validation(e.to_string()))?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(CouponError::NotFound(id))?;
        ensure_percentage_in_range(
            input.coupon_type.unwrap_or(existing.coupon_type),
            input.value.unwrap_or(existing.value),
        )?;

        if let Some(code) = input.code.take() {
            let code = normalize_code(&code);
            let taken = self
                .repository
                .find_by_code(&code)
                .await?
                .is_some_and(|other| other.id != id);
            if taken {
                return Err(CouponError::DuplicateCode(code));
            }
            input.code = Some(code);
        }

        Ok(self.repository.update(id, input).await?.into())
    }

    pub async fn delete_coupon(&self, id: Uuid) -> CouponResult<MessageResponse> {
        if !self.repository.delete(id).await? {
            return Err(CouponError::NotFound(id));
        }
        Ok(MessageResponse::new("Coupon deleted"))
    }
}

fn ensure_percentage_in_range(coupon_type: CouponType, value: Decimal) -> CouponResult<()> {
    if coupon_type == CouponType::Percentage && value > Decimal::ONE_HUNDRED {
        return Err(CouponError::PercentageTooHigh);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCouponRepository;
    use chrono::Duration;
    use entity::coupons;
    use mockall::predicate::*;
    use rust_decimal_macros::dec;

    fn model(code: &str) -> coupons::Model {
        let now = Utc::now().into();
        coupons::Model {
            id: Uuid::new_v4(),
            code: code.to_string(),
            coupon_type: CouponType::Percentage,
            value: dec!(10),
            min_amount: None,
            max_discount: None,
            usage_limit: None,
            used_count: 0,
            expires_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_input(code: &str, coupon_type: CouponType, value: Decimal) -> CreateCoupon {
        CreateCoupon {
            code: code.to_string(),
            coupon_type,
            value,
            min_amount: None,
            max_discount: None,
            usage_limit: None,
            expires_at: None,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_uppercases_code() {
        let mut mock = MockCouponRepository::new();
        mock.expect_find_by_code()
            .with(eq("SPRING20"))
            .returning(|_| Ok(None));
        mock.expect_create()
            .withf(|input| input.code == "SPRING20")
            .times(1)
            .returning(|input| Ok(model(&input.code)));

        let service = CouponService::new(mock);
        let coupon = service
            .create_coupon(create_input("spring20", CouponType::Percentage, dec!(20)))
            .await
            .unwrap();

        assert_eq!(coupon.code, "SPRING20");
    }

    #[tokio::test]
    async fn test_create_rejects_percentage_over_100() {
        let mut mock = MockCouponRepository::new();
        mock.expect_create().never();

        let service = CouponService::new(mock);
        let err = service
            .create_coupon(create_input("HUGE", CouponType::Percentage, dec!(150)))
            .await
            .unwrap_err();

        assert!(matches!(err, CouponError::PercentageTooHigh));
    }

    #[tokio::test]
    async fn test_create_allows_large_fixed_value() {
        let mut mock = MockCouponRepository::new();
        mock.expect_find_by_code().returning(|_| Ok(None));
        mock.expect_create().returning(|input| Ok(model(&input.code)));

        let service = CouponService::new(mock);
        assert!(
            service
                .create_coupon(create_input("BIGFIX", CouponType::Fixed, dec!(150)))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_code() {
        let mut mock = MockCouponRepository::new();
        mock.expect_find_by_code()
            .returning(|code| Ok(Some(model(code))));
        mock.expect_create().never();

        let service = CouponService::new(mock);
        let err = service
            .create_coupon(create_input("dup", CouponType::Fixed, dec!(5)))
            .await
            .unwrap_err();

        assert!(matches!(err, CouponError::DuplicateCode(code) if code == "DUP"));
    }

    #[tokio::test]
    async fn test_validate_unknown_code() {
        let mut mock = MockCouponRepository::new();
        mock.expect_find_by_code().returning(|_| Ok(None));

        let service = CouponService::new(mock);
        let err = service.validate_coupon("nope", dec!(10)).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid coupon code");
    }

    #[tokio::test]
    async fn test_validate_expired() {
        let mut mock = MockCouponRepository::new();
        mock.expect_find_by_code().returning(|code| {
            let mut coupon = model(code);
            coupon.expires_at = Some((Utc::now() - Duration::hours(1)).into());
            Ok(Some(coupon))
        });

        let service = CouponService::new(mock);
        let err = service.validate_coupon("OLD", dec!(10)).await.unwrap_err();
        assert!(matches!(err, CouponError::Expired));
    }

    #[tokio::test]
    async fn test_validate_returns_discount() {
        let mut mock = MockCouponRepository::new();
        mock.expect_find_by_code()
            .with(eq("TENOFF"))
            .returning(|code| Ok(Some(model(code))));

        let service = CouponService::new(mock);
        let result = service.validate_coupon("tenoff", dec!(80)).await.unwrap();
        assert_eq!(result.discount, dec!(8));
        assert_eq!(result.coupon.code, "TENOFF");
    }

    #[tokio::test]
    async fn test_update_checks_merged_percentage() {
        let existing = model("PCT");
        let id = existing.id;

        let mut mock = MockCouponRepository::new();
        mock.expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        mock.expect_update().never();

        let service = CouponService::new(mock);
        let err = service
            .update_coupon(
                id,
                UpdateCoupon {
                    value: Some(dec!(101)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CouponError::PercentageTooHigh));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let mut mock = MockCouponRepository::new();
        mock.expect_delete().returning(|_| Ok(false));

        let service = CouponService::new(mock);
        let err = service.delete_coupon(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CouponError::NotFound(_)));
    }
}
