use axum_helpers::validation::positive;
use chrono::{DateTime, Utc};
use entity::{PaymentStatus, payments};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    #[schema(example = "185.00")]
    pub amount: Decimal,
    #[schema(example = "USD")]
    pub currency: String,
    pub status: PaymentStatus,
    #[schema(example = "card")]
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<payments::Model> for Payment {
    fn from(model: payments::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            amount: model.amount,
            currency: model.currency,
            status: model.status,
            payment_method: model.payment_method,
            transaction_id: model.transaction_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePayment {
    pub order_id: Uuid,
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    /// Reference from the payment provider
    #[validate(length(min = 1, max = 255))]
    pub transaction_id: Option<String>,
}

/// A payment row ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePaymentStatus {
    pub status: PaymentStatus,
    #[validate(length(min = 1, max = 255))]
    pub transaction_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_payment_amount_must_be_positive() {
        let input: CreatePayment = serde_json::from_value(json!({
            "order_id": Uuid::new_v4(),
            "amount": "0.00",
            "payment_method": "card"
        }))
        .unwrap();
        assert!(input.validate().is_err());

        let input: CreatePayment = serde_json::from_value(json!({
            "order_id": Uuid::new_v4(),
            "amount": "12.50",
            "payment_method": "card",
            "transaction_id": "tx_123"
        }))
        .unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_payment_serializes_amount_as_string() {
        let now = Utc::now();
        let payment = Payment::from(payments::Model {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: Decimal::new(18500, 2),
            currency: "USD".into(),
            status: PaymentStatus::Completed,
            payment_method: "card".into(),
            transaction_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        });
        let value = serde_json::to_value(&payment).unwrap();
        assert_eq!(value["amount"], "185.00");
        assert_eq!(value["status"], "completed");
        assert!(value.get("user_id").is_none());
    }
}
