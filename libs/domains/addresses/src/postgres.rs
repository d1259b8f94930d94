use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use entity::{addresses, users};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::error::{AddressError, AddressResult};
use crate::models::UpdateAddress;
use crate::repository::AddressRepository;

pub struct PgAddressRepository {
    base: BaseRepository<addresses::Entity>,
}

impl PgAddressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }
}

/// Every column marked as set, for full-row writes
fn active(model: addresses::Model) -> addresses::ActiveModel {
    addresses::ActiveModel {
        id: Set(model.id),
        user_id: Set(model.user_id),
        label: Set(model.label),
        full_name: Set(model.full_name),
        phone: Set(model.phone),
        street: Set(model.street),
        apartment: Set(model.apartment),
        city: Set(model.city),
        state: Set(model.state),
        postal_code: Set(model.postal_code),
        country: Set(model.country),
        is_default: Set(model.is_default),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

/// Writes touching a user's default flag take this lock first
async fn lock_owner<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AddressResult<()> {
    users::Entity::find_by_id(user_id)
        .lock_exclusive()
        .one(conn)
        .await?;
    Ok(())
}

fn map_write_error(err: DbErr) -> AddressError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AddressError::DefaultConflict,
        _ => err.into(),
    }
}

/// Clear `is_default` on every other address of the user
async fn clear_defaults<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    keep: Uuid,
) -> AddressResult<()> {
    addresses::Entity::update_many()
        .col_expr(addresses::Column::IsDefault, Expr::value(false))
        .filter(addresses::Column::UserId.eq(user_id))
        .filter(addresses::Column::Id.ne(keep))
        .filter(addresses::Column::IsDefault.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn list(&self, user_id: Uuid) -> AddressResult<Vec<addresses::Model>> {
        let models = addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_desc(addresses::Column::IsDefault)
            .order_by_desc(addresses::Column::CreatedAt)
            .all(self.db())
            .await?;
        Ok(models)
    }

    async fn find(&self, id: Uuid, user_id: Uuid) -> AddressResult<Option<addresses::Model>> {
        let model = addresses::Entity::find_by_id(id)
            .filter(addresses::Column::UserId.eq(user_id))
            .one(self.db())
            .await?;
        Ok(model)
    }

    async fn create(&self, mut address: addresses::Model) -> AddressResult<addresses::Model> {
        let txn = self.db().begin().await?;
        lock_owner(&txn, address.user_id).await?;

        let existing = addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(address.user_id))
            .count(&txn)
            .await?;
        if existing == 0 {
            address.is_default = true;
        }
        if address.is_default {
            clear_defaults(&txn, address.user_id, address.id).await?;
        }
        let model = active(address)
            .insert(&txn)
            .await
            .map_err(map_write_error)?;
        txn.commit().await?;

        tracing::info!(address_id = %model.id, default = model.is_default, "Created address");
        Ok(model)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: UpdateAddress,
    ) -> AddressResult<Option<addresses::Model>> {
        let txn = self.db().begin().await?;
        lock_owner(&txn, user_id).await?;
        let Some(mut address) = addresses::Entity::find_by_id(id)
            .filter(addresses::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        input.apply(&mut address);
        address.updated_at = Utc::now().into();
        if address.is_default {
            clear_defaults(&txn, user_id, id).await?;
        }
        let model = active(address)
            .update(&txn)
            .await
            .map_err(map_write_error)?;
        txn.commit().await?;

        tracing::info!(address_id = %id, default = model.is_default, "Updated address");
        Ok(Some(model))
    }

    async fn set_default(&self, id: Uuid, user_id: Uuid) -> AddressResult<Option<addresses::Model>> {
        self.update(
            id,
            user_id,
            UpdateAddress {
                is_default: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AddressResult<bool> {
        let result = addresses::Entity::delete_many()
            .filter(addresses::Column::Id.eq(id))
            .filter(addresses::Column::UserId.eq(user_id))
            .exec(self.db())
            .await?;
        if result.rows_affected > 0 {
            tracing::info!(address_id = %id, "Deleted address");
        }
        Ok(result.rows_affected > 0)
    }
}
