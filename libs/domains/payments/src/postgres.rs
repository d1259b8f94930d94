use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use entity::{OrderStatus, PaymentStatus, orders, payments};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::error::{PaymentError, PaymentResult};
use crate::models::{NewPayment, UpdatePaymentStatus};
use crate::repository::PaymentRepository;

pub struct PgPaymentRepository {
    base: BaseRepository<payments::Entity>,
}

impl PgPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }
}

fn map_insert_error(err: DbErr) -> PaymentError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => PaymentError::AlreadyInitiated,
        _ => err.into(),
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn find_order(&self, order_id: Uuid, user_id: Uuid) -> PaymentResult<Option<orders::Model>> {
        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::UserId.eq(user_id))
            .one(self.db())
            .await?;
        Ok(order)
    }

    async fn find_by_order(&self, order_id: Uuid) -> PaymentResult<Option<payments::Model>> {
        let payment = payments::Entity::find()
            .filter(payments::Column::OrderId.eq(order_id))
            .one(self.db())
            .await?;
        Ok(payment)
    }

    async fn create(&self, payment: NewPayment) -> PaymentResult<payments::Model> {
        let now = Utc::now().into();
        let model = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(payment.order_id),
            user_id: Set(payment.user_id),
            amount: Set(payment.amount),
            currency: Set(payment.currency),
            status: Set(PaymentStatus::Pending),
            payment_method: Set(payment.payment_method),
            transaction_id: Set(payment.transaction_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db())
        .await
        .map_err(map_insert_error)?;

        tracing::info!(payment_id = %model.id, order_id = %model.order_id, "Created payment");
        Ok(model)
    }

    async fn list_for_user(&self, user_id: Uuid) -> PaymentResult<Vec<payments::Model>> {
        let models = payments::Entity::find()
            .filter(payments::Column::UserId.eq(user_id))
            .order_by_desc(payments::Column::CreatedAt)
            .all(self.db())
            .await?;
        Ok(models)
    }

    async fn find(&self, id: Uuid, user_id: Option<Uuid>) -> PaymentResult<Option<payments::Model>> {
        let mut query = payments::Entity::find_by_id(id);
        if let Some(user_id) = user_id {
            query = query.filter(payments::Column::UserId.eq(user_id));
        }
        Ok(query.one(self.db()).await?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        input: UpdatePaymentStatus,
    ) -> PaymentResult<payments::Model> {
        let txn = self.db().begin().await?;
        let now = Utc::now();

        let payment = payments::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PaymentError::NotFound(id))?;
        let order_id = payment.order_id;

        let mut active = payment.into_active_model();
        active.status = Set(input.status);
        if let Some(transaction_id) = input.transaction_id {
            active.transaction_id = Set(Some(transaction_id));
        }
        active.updated_at = Set(now.into());
        let payment = active.update(&txn).await?;

        if input.status == PaymentStatus::Completed {
            let pending = orders::Entity::find_by_id(order_id)
                .filter(orders::Column::Status.eq(OrderStatus::Pending))
                .lock_exclusive()
                .one(&txn)
                .await?;
            if let Some(order) = pending {
                let mut order = order.into_active_model();
                order.status = Set(OrderStatus::Processing);
                order.updated_at = Set(now.into());
                order.update(&txn).await?;
                tracing::info!(order_id = %order_id, "Order moved to processing");
            }
        }

        txn.commit().await?;

        tracing::info!(payment_id = %id, status = %payment.status, "Updated payment status");
        Ok(payment)
    }
}
