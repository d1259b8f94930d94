use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use entity::{Role, users};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, UpdateProfile, UserFilter};
use crate::repository::UserRepository;

pub struct PgUserRepository {
    base: BaseRepository<users::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn load(&self, id: Uuid) -> UserResult<users::Model> {
        self.base
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}

fn map_insert_error(err: DbErr, email: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => err.into(),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<users::Model> {
        let email = user.email.to_lowercase();
        let now = Utc::now().into();

        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.clone()),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            phone: Set(user.phone),
            role: Set(user.role),
            is_active: Set(true),
            refresh_token_hash: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.base.db())
        .await
        .map_err(|e| map_insert_error(e, &email))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<users::Model>> {
        Ok(self.base.find_by_id(id).await?)
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .one(self.base.db())
            .await?;
        Ok(user)
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<users::Model>> {
        let mut query = users::Entity::find();

        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role));
        }

        let models = query
            .order_by_desc(users::Column::CreatedAt)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.base.db())
            .await?;

        Ok(models)
    }

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> UserResult<users::Model> {
        let mut active = self.load(id).await?.into_active_model();

        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(self.base.db()).await?;
        tracing::info!(user_id = %id, "Updated user profile");
        Ok(model)
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> UserResult<()> {
        let mut active = self.load(id).await?.into_active_model();
        active.password_hash = Set(password_hash);
        active.refresh_token_hash = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(self.base.db()).await?;

        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    async fn set_refresh_token_hash(&self, id: Uuid, hash: Option<String>) -> UserResult<()> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::RefreshTokenHash, Expr::value(hash))
            .filter(users::Column::Id.eq(id))
            .exec(self.base.db())
            .await?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> UserResult<users::Model> {
        let mut active = self.load(id).await?.into_active_model();
        active.role = Set(role);
        active.updated_at = Set(Utc::now().into());

        let model = active.update(self.base.db()).await?;
        tracing::info!(user_id = %id, role = %role, "Changed user role");
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;

        if rows_affected > 0 {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
