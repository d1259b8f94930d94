use async_trait::async_trait;
use chrono::Utc;
use entity::{Role, users};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, UpdateProfile, UserFilter};

/// Repository trait for user persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user, failing with `DuplicateEmail` when the email is taken
    async fn create(&self, user: NewUser) -> UserResult<users::Model>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<users::Model>>;

    /// Lookup by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> UserResult<Option<users::Model>>;

    /// List users newest first
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<users::Model>>;

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> UserResult<users::Model>;

    /// Replace the password hash and drop the stored refresh token
    async fn set_password(&self, id: Uuid, password_hash: String) -> UserResult<()>;

    /// Store (or clear with `None`) the refresh token fingerprint
    async fn set_refresh_token_hash(&self, id: Uuid, hash: Option<String>) -> UserResult<()>;

    async fn set_role(&self, id: Uuid, role: Role) -> UserResult<users::Model>;

    /// Delete a user, returns false when absent
    async fn delete(&self, id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, users::Model>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<users::Model> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let now = Utc::now().into();
        let model = users::Model {
            id: Uuid::new_v4(),
            email: user.email.to_lowercase(),
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            role: user.role,
            is_active: true,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(model.id, model.clone());

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<users::Model>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<users::Model>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<users::Model>> {
        let users = self.users.read().await;

        let mut result: Vec<users::Model> = users
            .values()
            .filter(|u| filter.role.is_none_or(|role| u.role == role))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> UserResult<users::Model> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;

        if let Some(first_name) = input.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            user.last_name = last_name;
        }
        if input.phone.is_some() {
            user.phone = input.phone;
        }
        user.updated_at = Utc::now().into();

        Ok(user.clone())
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> UserResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        user.password_hash = password_hash;
        user.refresh_token_hash = None;
        user.updated_at = Utc::now().into();
        Ok(())
    }

    async fn set_refresh_token_hash(&self, id: Uuid, hash: Option<String>) -> UserResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        user.refresh_token_hash = hash;
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> UserResult<users::Model> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        user.role = role;
        user.updated_at = Utc::now().into();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
            role,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("jane@example.com", Role::Customer))
            .await
            .unwrap();

        let err = repo
            .create(new_user("JANE@example.com", Role::Customer))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_role() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@example.com", Role::Customer))
            .await
            .unwrap();
        repo.create(new_user("b@example.com", Role::Admin))
            .await
            .unwrap();

        let admins = repo
            .list(UserFilter {
                role: Some(Role::Admin),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, "b@example.com");
    }

    #[tokio::test]
    async fn test_set_password_clears_refresh_token() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(new_user("c@example.com", Role::Customer))
            .await
            .unwrap();
        repo.set_refresh_token_hash(user.id, Some("abc".into()))
            .await
            .unwrap();

        repo.set_password(user.id, "new-hash".into()).await.unwrap();

        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "new-hash");
        assert!(stored.refresh_token_hash.is_none());
    }
}
