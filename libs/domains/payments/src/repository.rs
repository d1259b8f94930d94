use async_trait::async_trait;
use entity::{orders, payments};
use uuid::Uuid;

use crate::error::PaymentResult;
use crate::models::{NewPayment, UpdatePaymentStatus};

/// Repository trait for payment persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// The order when it belongs to `user_id`
    async fn find_order(&self, order_id: Uuid, user_id: Uuid) -> PaymentResult<Option<orders::Model>>;

    async fn find_by_order(&self, order_id: Uuid) -> PaymentResult<Option<payments::Model>>;

    async fn create(&self, payment: NewPayment) -> PaymentResult<payments::Model>;

    /// Newest first
    async fn list_for_user(&self, user_id: Uuid) -> PaymentResult<Vec<payments::Model>>;

    /// A payment by id, scoped to `user_id` when given
    async fn find(&self, id: Uuid, user_id: Option<Uuid>) -> PaymentResult<Option<payments::Model>>;

    /// Set the status; completing a payment moves a pending order to processing
    async fn update_status(
        &self,
        id: Uuid,
        input: UpdatePaymentStatus,
    ) -> PaymentResult<payments::Model>;
}
