//! Coupons Domain
//!
//! Admin-managed discount codes plus the eligibility and discount rules
//! in [`rules`], which checkout applies inside its own transaction.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod rules;
pub mod service;

pub use error::{CouponError, CouponResult};
pub use models::{Coupon, CouponValidation, CreateCoupon, UpdateCoupon, normalize_code};
pub use postgres::PgCouponRepository;
pub use repository::CouponRepository;
pub use rules::{check_usable, discount_for};
pub use service::CouponService;
