//! Shared test utilities for the domain crates
//!
//! - `TestDatabase`: PostgreSQL container with the shop migrations applied
//! - `TestDataBuilder`: deterministic names, emails and SKUs per test
//! - `fixtures`: insert users, catalog rows, addresses and coupons directly
//! - `http`: `TestAuth` token minting plus request/body helpers for handler tests
//! - `assertions`: small assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder, fixtures};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let user = fixtures::user(&db.connection, &builder, "buyer").await;
//!     let category = fixtures::category(&db.connection, &builder, "shoes").await;
//!     let product = fixtures::product(&db.connection, &builder, category.id, "runner", "49.99", 3).await;
//! }
//! ```

use uuid::Uuid;

pub mod fixtures;
pub mod http;
mod postgres;

pub use http::{TestAuth, json_body, request};
pub use postgres::TestDatabase;

/// Builder for test data with deterministic values
///
/// Values derive from a seed so reruns of one test produce the same rows,
/// while different tests never collide on unique columns.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name (recommended)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_checkout");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn user_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("product", "main"), "test-product-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    pub fn email(&self, suffix: &str) -> String {
        format!("test-{}-{}@example.com", self.seed, suffix)
    }

    pub fn slug(&self, prefix: &str, suffix: &str) -> String {
        self.name(prefix, suffix)
    }

    pub fn sku(&self, suffix: &str) -> String {
        format!("SKU-{}-{}", self.seed, suffix.to_uppercase())
    }

    pub fn coupon_code(&self, suffix: &str) -> String {
        format!("T{}{}", self.seed % 1_000_000, suffix.to_uppercase())
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.user_id(), builder2.user_id());
        assert_eq!(builder1.email("buyer"), builder2.email("buyer"));
        assert_eq!(builder1.sku("red"), "SKU-42-RED");
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.user_id(), builder2.user_id());
        assert_ne!(builder1.slug("category", "a"), builder2.slug("category", "a"));
    }
}
