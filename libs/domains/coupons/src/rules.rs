//! Coupon eligibility and discount math, shared with checkout.

use chrono::{DateTime, Utc};
use entity::{CouponType, coupons};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CouponError, CouponResult};

/// Check a coupon against an order total.
///
/// Order matters: inactive, then expired, then exhausted, then minimum amount.
pub fn check_usable(
    coupon: &coupons::Model,
    total: Decimal,
    now: DateTime<Utc>,
) -> CouponResult<()> {
    if !coupon.is_active {
        return Err(CouponError::InvalidCode);
    }
    if coupon.expires_at.is_some_and(|expires_at| expires_at < now) {
        return Err(CouponError::Expired);
    }
    if coupon
        .usage_limit
        .is_some_and(|limit| coupon.used_count >= limit)
    {
        return Err(CouponError::UsageLimitReached);
    }
    match coupon.min_amount {
        Some(min_amount) if total < min_amount => Err(CouponError::MinimumNotMet(min_amount)),
        _ => Ok(()),
    }
}

/// Discount for `total`, capped by `max_discount` and by the total itself.
pub fn discount_for(coupon: &coupons::Model, total: Decimal) -> Decimal {
    let raw = match coupon.coupon_type {
        CouponType::Percentage => {
            let pct = total * coupon.value / Decimal::ONE_HUNDRED;
            coupon.max_discount.map_or(pct, |cap| pct.min(cap))
        }
        CouponType::Fixed => coupon.value,
    };

    raw.min(total)
        .max(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn coupon(coupon_type: CouponType, value: Decimal) -> coupons::Model {
        let now = Utc::now().into();
        coupons::Model {
            id: Uuid::new_v4(),
            code: "SAVE".to_string(),
            coupon_type,
            value,
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

    #[test]
    fn test_percentage_discount_rounds_to_cents() {
        let c = coupon(CouponType::Percentage, dec!(15));
        assert_eq!(discount_for(&c, dec!(33.33)), dec!(5.00));
        assert_eq!(discount_for(&c, dec!(10.10)), dec!(1.52));
    }

    #[test]
    fn test_percentage_discount_capped_by_max() {
        let mut c = coupon(CouponType::Percentage, dec!(50));
        c.max_discount = Some(dec!(20));
        assert_eq!(discount_for(&c, dec!(100)), dec!(20));
    }

    #[test]
    fn test_fixed_discount_capped_by_total() {
        let c = coupon(CouponType::Fixed, dec!(25));
        assert_eq!(discount_for(&c, dec!(40)), dec!(25));
        assert_eq!(discount_for(&c, dec!(12.5)), dec!(12.5));
    }

    #[test]
    fn test_check_order_inactive_before_expired() {
        let mut c = coupon(CouponType::Fixed, dec!(5));
        c.is_active = false;
        c.expires_at = Some((Utc::now() - Duration::days(1)).into());
        assert!(matches!(
            check_usable(&c, dec!(100), Utc::now()),
            Err(CouponError::InvalidCode)
        ));
    }

    #[test]
    fn test_check_order_expired_before_exhausted() {
        let mut c = coupon(CouponType::Fixed, dec!(5));
        c.expires_at = Some((Utc::now() - Duration::days(1)).into());
        c.usage_limit = Some(1);
        c.used_count = 1;
        assert!(matches!(
            check_usable(&c, dec!(100), Utc::now()),
            Err(CouponError::Expired)
        ));
    }

    #[test]
    fn test_check_order_exhausted_before_minimum() {
        let mut c = coupon(CouponType::Fixed, dec!(5));
        c.usage_limit = Some(3);
        c.used_count = 3;
        c.min_amount = Some(dec!(50));
        assert!(matches!(
            check_usable(&c, dec!(10), Utc::now()),
            Err(CouponError::UsageLimitReached)
        ));
    }

    #[test]
    fn test_minimum_message() {
        let mut c = coupon(CouponType::Fixed, dec!(5));
        c.min_amount = Some(dec!(50.00));
        let err = check_usable(&c, dec!(49.99), Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Minimum order amount 50.00 required");
        assert!(check_usable(&c, dec!(50), Utc::now()).is_ok());
    }

    #[test]
    fn test_future_expiry_is_usable() {
        let mut c = coupon(CouponType::Percentage, dec!(10));
        c.expires_at = Some((Utc::now() + Duration::days(1)).into());
        assert!(check_usable(&c, dec!(1), Utc::now()).is_ok());
    }
}
