use domain_coupons::normalize_code;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    Checkout, CheckoutRequest, DEFAULT_PAYMENT_METHOD, Order, OrderQuery, Paginated,
    UpdateOrderStatus,
};
use crate::repository::OrderRepository;

pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
    currency: String,
}

impl<R: OrderRepository> OrderService<R> {
    /// `currency` is recorded on the payment created at checkout
    pub fn new(repository: R, currency: impl Into<String>) -> Self {
        Self {
            repository: Arc::new(repository),
            currency: currency.into(),
        }
    }

    #[instrument(skip(self, input), fields(address_id = %input.address_id))]
    pub async fn checkout(&self, user_id: Uuid, input: Checkout) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let request = CheckoutRequest {
            user_id,
            address_id: input.address_id,
            note: input.note.filter(|n| !n.trim().is_empty()),
            coupon_code: input
                .coupon_code
                .as_deref()
                .map(normalize_code)
                .filter(|c| !c.is_empty()),
            payment_method: input
                .payment_method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            currency: self.currency.clone(),
        };

        Ok(self.repository.checkout(request).await?.into())
    }

    pub async fn list_my_orders(
        &self,
        user_id: Uuid,
        query: OrderQuery,
    ) -> OrderResult<Paginated<Order>> {
        self.page(Some(user_id), query).await
    }

    pub async fn list_all_orders(&self, query: OrderQuery) -> OrderResult<Paginated<Order>> {
        self.page(None, query).await
    }

    pub async fn get_my_order(&self, user_id: Uuid, id: Uuid) -> OrderResult<Order> {
        self.repository
            .find(id, Some(user_id))
            .await?
            .map(Order::from)
            .ok_or(OrderError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&self, user_id: Uuid, id: Uuid) -> OrderResult<Order> {
        Ok(self.repository.cancel(id, user_id).await?.into())
    }

    /// Admin status change; `cancelled` and `delivered` orders are frozen
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: Uuid, input: UpdateOrderStatus) -> OrderResult<Order> {
        Ok(self.repository.set_status(id, input.status).await?.into())
    }

    async fn page(&self, user_id: Option<Uuid>, query: OrderQuery) -> OrderResult<Paginated<Order>> {
        query
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let (page, limit) = (query.page, query.limit);
        let (records, total) = self.repository.list(user_id, query).await?;

        Ok(Paginated {
            data: records.into_iter().map(Order::from).collect(),
            total,
            page,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderRecord;
    use crate::repository::MockOrderRepository;
    use chrono::Utc;
    use entity::{OrderStatus, orders};
    use mockall::predicate::*;
    use rust_decimal::Decimal;

    fn record(user_id: Uuid, status: OrderStatus) -> OrderRecord {
        let now = Utc::now().into();
        OrderRecord {
            order: orders::Model {
                id: Uuid::new_v4(),
                order_number: "ORD-20250301-ABCDEF12".to_string(),
                user_id,
                status,
                sub_total: Decimal::new(2000, 2),
                tax_amount: Decimal::ZERO,
                shipping_cost: Decimal::ZERO,
                discount_amount: Decimal::ZERO,
                total_amount: Decimal::new(2000, 2),
                coupon_code: None,
                shipping_address: "Jane Doe, 1 Main St".to_string(),
                note: None,
                created_at: now,
                updated_at: now,
            },
            items: vec![],
            user: None,
            payment: None,
        }
    }

    #[tokio::test]
    async fn test_checkout_applies_defaults() {
        let user_id = Uuid::new_v4();
        let address_id = Uuid::new_v4();

        let mut mock = MockOrderRepository::new();
        mock.expect_checkout()
            .withf(move |req| {
                req.user_id == user_id
                    && req.address_id == address_id
                    && req.payment_method == "cash_on_delivery"
                    && req.coupon_code.as_deref() == Some("SAVE10")
                    && req.currency == "EUR"
                    && req.note.is_none()
            })
            .times(1)
            .returning(move |_| Ok(record(user_id, OrderStatus::Pending)));

        let service = OrderService::new(mock, "EUR");
        let order = service
            .checkout(
                user_id,
                Checkout {
                    address_id,
                    note: Some("  ".to_string()),
                    coupon_code: Some(" save10 ".to_string()),
                    payment_method: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_my_order_scopes_by_user() {
        let user_id = Uuid::new_v4();
        let id = Uuid::new_v4();

        let mut mock = MockOrderRepository::new();
        mock.expect_find()
            .with(eq(id), eq(Some(user_id)))
            .returning(|_, _| Ok(None));

        let service = OrderService::new(mock, "USD");
        let err = service.get_my_order(user_id, id).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Order with ID {} not found", id));
    }

    #[tokio::test]
    async fn test_list_returns_envelope() {
        let user_id = Uuid::new_v4();

        let mut mock = MockOrderRepository::new();
        mock.expect_list()
            .withf(move |uid, query| *uid == Some(user_id) && query.page == 2 && query.limit == 1)
            .returning(move |_, _| Ok((vec![record(user_id, OrderStatus::Pending)], 3)));

        let service = OrderService::new(mock, "USD");
        let page = service
            .list_my_orders(
                user_id,
                OrderQuery {
                    page: 2,
                    limit: 1,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 1);
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn test_list_rejects_page_zero() {
        let mut mock = MockOrderRepository::new();
        mock.expect_list().never();

        let service = OrderService::new(mock, "USD");
        let result = service
            .list_all_orders(OrderQuery {
                page: 0,
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_status_surfaces_final_status() {
        let id = Uuid::new_v4();

        let mut mock = MockOrderRepository::new();
        mock.expect_find().never();
        mock.expect_set_status()
            .with(eq(id), eq(OrderStatus::Processing))
            .times(1)
            .returning(|_, _| Err(OrderError::FinalStatus(OrderStatus::Delivered)));

        let service = OrderService::new(mock, "USD");
        let err = service
            .update_status(
                id,
                UpdateOrderStatus {
                    status: OrderStatus::Processing,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::FinalStatus(OrderStatus::Delivered)));
    }

    #[tokio::test]
    async fn test_update_status_moves_pending_order() {
        let existing = record(Uuid::new_v4(), OrderStatus::Pending);
        let id = existing.order.id;
        let user_id = existing.order.user_id;

        let mut mock = MockOrderRepository::new();
        mock.expect_set_status()
            .with(eq(id), eq(OrderStatus::Shipped))
            .times(1)
            .returning(move |_, status| Ok(record(user_id, status)));

        let service = OrderService::new(mock, "USD");
        let order = service
            .update_status(
                id,
                UpdateOrderStatus {
                    status: OrderStatus::Shipped,
                },
            )
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
    }
}
