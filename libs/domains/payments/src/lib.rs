//! Payments Domain
//!
//! One payment per order. Checkout already opens a pending payment; this
//! crate lets a customer start one explicitly and lets an admin record the
//! provider's outcome. A completed payment advances its pending order to
//! `processing` in the same transaction.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{PaymentError, PaymentResult};
pub use models::{CreatePayment, NewPayment, Payment, UpdatePaymentStatus};
pub use postgres::PgPaymentRepository;
pub use repository::PaymentRepository;
pub use service::PaymentService;
