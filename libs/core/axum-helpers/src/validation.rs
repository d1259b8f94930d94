//! Custom `validator` functions for fields the derive cannot check.
//!
//! ```ignore
//! #[derive(Deserialize, Validate)]
//! struct CreateVariant {
//!     #[validate(custom(function = "axum_helpers::validation::non_negative"))]
//!     price: Decimal,
//! }
//! ```

use rust_decimal::Decimal;
use validator::ValidationError;

/// Amount must be `>= 0`
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative").with_message("must not be negative".into()));
    }
    Ok(())
}

/// Amount must be `> 0`
pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("positive").with_message("must be greater than zero".into()));
    }
    Ok(())
}

/// Upper-case ISO 4217 style code, e.g. `USD`
pub fn currency_code(value: &str) -> Result<(), ValidationError> {
    if value.len() != 3 || !value.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::new("currency_code"));
    }
    Ok(())
}
