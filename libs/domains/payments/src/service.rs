use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{PaymentError, PaymentResult};
use crate::models::{CreatePayment, NewPayment, Payment, UpdatePaymentStatus};
use crate::repository::PaymentRepository;

pub struct PaymentService<R: PaymentRepository> {
    repository: Arc<R>,
    currency: String,
}

impl<R: PaymentRepository> PaymentService<R> {
    pub fn new(repository: R, currency: impl Into<String>) -> Self {
        Self {
            repository: Arc::new(repository),
            currency: currency.into(),
        }
    }

    /// Start a payment for one of the user's orders
    pub async fn create_payment(&self, user_id: Uuid, input: CreatePayment) -> PaymentResult<Payment> {
        input
            .validate()
            .map_err(|e| PaymentError::Validation(e.to_string()))?;

        self.repository
            .find_order(input.order_id, user_id)
            .await?
            .ok_or(PaymentError::OrderNotFound)?;

        if self.repository.find_by_order(input.order_id).await?.is_some() {
            tracing::warn!(order_id = %input.order_id, "Payment already exists for order");
            return Err(PaymentError::AlreadyInitiated);
        }

        let payment = self
            .repository
            .create(NewPayment {
                order_id: input.order_id,
                user_id,
                amount: input.amount,
                currency: self.currency.clone(),
                payment_method: input.payment_method,
                transaction_id: input.transaction_id,
            })
            .await?;
        Ok(payment.into())
    }

    pub async fn list_my_payments(&self, user_id: Uuid) -> PaymentResult<Vec<Payment>> {
        let payments = self.repository.list_for_user(user_id).await?;
        Ok(payments.into_iter().map(Payment::from).collect())
    }

    pub async fn get_my_payment(&self, user_id: Uuid, id: Uuid) -> PaymentResult<Payment> {
        self.repository
            .find(id, Some(user_id))
            .await?
            .map(Payment::from)
            .ok_or(PaymentError::NotFound(id))
    }

    pub async fn update_status(&self, id: Uuid, input: UpdatePaymentStatus) -> PaymentResult<Payment> {
        input
            .validate()
            .map_err(|e| PaymentError::Validation(e.to_string()))?;
        Ok(self.repository.update_status(id, input).await?.into())
    }
}
