use chrono::{DateTime, Utc};
use entity::{OrderStatus, PaymentStatus, order_items, orders, payments, users};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAYMENT_METHOD: &str = "cash_on_delivery";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    /// Product name at checkout time
    pub product_name: String,
    pub quantity: i32,
    #[schema(example = "19.99")]
    pub price: Decimal,
    #[schema(example = "39.98")]
    pub subtotal: Decimal,
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            variant_id: model.variant_id,
            product_name: model.product_name,
            quantity: model.quantity,
            price: model.price,
            subtotal: model.price * Decimal::from(model.quantity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentSummary {
    pub id: Uuid,
    pub status: PaymentStatus,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
}

impl From<payments::Model> for PaymentSummary {
    fn from(model: payments::Model) -> Self {
        Self {
            id: model.id,
            status: model.status,
            amount: model.amount,
            currency: model.currency,
            payment_method: model.payment_method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    #[schema(example = "ORD-20250301-1A2B3C4D")]
    pub order_number: String,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub sub_total: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub coupon_code: Option<String>,
    pub shipping_address: String,
    pub note: Option<String>,
    pub items: Vec<OrderItem>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub payment: Option<PaymentSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order row with everything the response needs
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub order: orders::Model,
    pub items: Vec<order_items::Model>,
    pub user: Option<users::Model>,
    pub payment: Option<payments::Model>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        let OrderRecord {
            order,
            items,
            user,
            payment,
        } = record;
        Self {
            id: order.id,
            order_number: order.order_number,
            user_id: order.user_id,
            status: order.status,
            sub_total: order.sub_total,
            tax_amount: order.tax_amount,
            shipping_cost: order.shipping_cost,
            discount_amount: order.discount_amount,
            total_amount: order.total_amount,
            coupon_code: order.coupon_code,
            shipping_address: order.shipping_address,
            note: order.note,
            items: items.into_iter().map(OrderItem::from).collect(),
            user_email: user.as_ref().map(|u| u.email.clone()),
            user_name: user
                .as_ref()
                .map(|u| format!("{} {}", u.first_name, u.last_name).trim().to_string()),
            payment: payment.map(PaymentSummary::from),
            created_at: order.created_at.with_timezone(&Utc),
            updated_at: order.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Checkout {
    pub address_id: Uuid,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub coupon_code: Option<String>,
    /// Defaults to `cash_on_delivery`
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "cash_on_delivery")]
    pub payment_method: Option<String>,
}

/// Checkout input after defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub note: Option<String>,
    /// Normalized coupon code
    pub coupon_code: Option<String>,
    pub payment_method: String,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 1_000_000))]
    pub page: u64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    pub status: Option<OrderStatus>,
    /// Substring of the order number
    #[validate(length(min = 1, max = 50))]
    pub search: Option<String>,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            status: None,
            search: None,
        }
    }
}

impl OrderQuery {
    /// Rows to skip, or `None` when the page lies beyond any addressable row
    pub fn offset(&self) -> Option<u64> {
        (self.page.max(1) - 1)
            .checked_mul(self.limit)
            .filter(|offset| *offset <= i64::MAX as u64)
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
}

/// `ORD-YYYYMMDD-XXXXXXXX` with eight random upper-case hex digits
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "ORD-{}-{}",
        now.format("%Y%m%d"),
        random[..8].to_uppercase()
    )
}
