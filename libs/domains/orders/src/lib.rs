//! Orders Domain
//!
//! Checkout turns the caller's open cart into an order in one database
//! transaction:
//!
//! ```text
//! cart ─► address snapshot ─► price lines ─► coupon ─► order + items
//!                                                        │
//!            payment (pending) ◄─ cart closed ◄─ stock decremented
//! ```
//!
//! Stock is taken with `UPDATE .. WHERE stock >= qty`; a miss aborts the
//! whole transaction. Cancelling a pending order reverses stock and coupon
//! usage and fails the pending payment.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod pricing;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use models::{
    Checkout, Order, OrderItem, OrderQuery, OrderRecord, Paginated, PaymentSummary,
    UpdateOrderStatus,
};
pub use postgres::PgOrderRepository;
pub use repository::OrderRepository;
pub use service::OrderService;
