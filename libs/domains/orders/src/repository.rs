use async_trait::async_trait;
use entity::OrderStatus;
use uuid::Uuid;

use crate::error::OrderResult;
use crate::models::{CheckoutRequest, OrderQuery, OrderRecord};

/// Repository trait for orders
///
/// `checkout` and `cancel` each run in a single database transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Turn the user's open cart into a pending order with a pending payment
    async fn checkout(&self, request: CheckoutRequest) -> OrderResult<OrderRecord>;

    /// An order by id, scoped to `user_id` when given
    async fn find(&self, id: Uuid, user_id: Option<Uuid>) -> OrderResult<Option<OrderRecord>>;

    /// Newest first, with the total number of matches
    async fn list(
        &self,
        user_id: Option<Uuid>,
        query: OrderQuery,
    ) -> OrderResult<(Vec<OrderRecord>, u64)>;

    /// Cancel a pending order, restoring stock and coupon usage
    async fn cancel(&self, id: Uuid, user_id: Uuid) -> OrderResult<OrderRecord>;

    /// Admin status change; fails with `FinalStatus` once an order is cancelled or delivered
    async fn set_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<OrderRecord>;
}
