use axum_helpers::{JwtAuth, TokenPair, TokenType};
use entity::{Role, users};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, NewUser, RegisterRequest, UpdateProfile,
    UserFilter, UserResponse,
};
use crate::password::{check_strength, hash_password, verify_password};
use crate::repository::UserRepository;

/// Accounts and token lifecycle
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            jwt: self.jwt.clone(),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Create a customer account and sign it in
    pub async fn register(&self, input: RegisterRequest) -> UserResult<AuthResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if self.repository.find_by_email(&input.email).await?.is_some() {
            tracing::warn!("Registration rejected: email already in use");
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = self
            .repository
            .create(NewUser {
                email: input.email,
                password_hash: hash_password(&input.password)?,
                first_name: input.first_name,
                last_name: input.last_name,
                phone: input.phone,
                role: Role::Customer,
            })
            .await?;

        self.sign_in(user).await
    }

    pub async fn login(&self, input: LoginRequest) -> UserResult<AuthResponse> {
        let Some(user) = self.repository.find_by_email(&input.email).await? else {
            return Err(UserError::InvalidCredentials);
        };

        if !user.is_active || !verify_password(&input.password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Login rejected");
            return Err(UserError::InvalidCredentials);
        }

        self.sign_in(user).await
    }

    /// Exchange a refresh token for a new pair. The old refresh token stops working.
    pub async fn refresh(&self, refresh_token: &str) -> UserResult<AuthResponse> {
        let claims = self
            .jwt
            .verify(refresh_token, TokenType::Refresh)
            .map_err(|_| UserError::InvalidRefreshToken)?;

        let user = self
            .repository
            .find_by_id(claims.sub)
            .await?
            .ok_or(UserError::InvalidRefreshToken)?;

        let presented = JwtAuth::fingerprint(refresh_token);
        if !user.is_active || user.refresh_token_hash.as_deref() != Some(presented.as_str()) {
            tracing::warn!(user_id = %user.id, "Refresh token does not match stored token");
            return Err(UserError::InvalidRefreshToken);
        }

        self.sign_in(user).await
    }

    pub async fn logout(&self, user_id: Uuid) -> UserResult<()> {
        self.repository.set_refresh_token_hash(user_id, None).await
    }

    pub async fn get_profile(&self, user_id: Uuid) -> UserResult<UserResponse> {
        self.get_user(user_id).await
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfile,
    ) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let user = self.repository.update_profile(user_id, input).await?;
        Ok(user.into())
    }

    /// Verify the current password, store the new hash and revoke the refresh token
    pub async fn change_password(
        &self,
        user_id: Uuid,
        input: ChangePasswordRequest,
    ) -> UserResult<()> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        if !verify_password(&input.current_password, &user.password_hash)? {
            return Err(UserError::IncorrectPassword);
        }
        check_strength(&input.new_password).map_err(|msg| UserError::Validation(msg.into()))?;

        self.repository
            .set_password(user_id, hash_password(&input.new_password)?)
            .await
    }

    pub async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list(filter).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound(id))
    }

    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Make sure an admin account exists for `email`: create it, or promote
    /// the existing account. The password of an existing account is left alone.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> UserResult<UserResponse> {
        if let Some(user) = self.repository.find_by_email(email).await? {
            if user.role == Role::Admin {
                return Ok(user.into());
            }
            let user = self.repository.set_role(user.id, Role::Admin).await?;
            tracing::info!(user_id = %user.id, "Promoted bootstrap account to admin");
            return Ok(user.into());
        }

        check_strength(password).map_err(|msg| UserError::Validation(msg.into()))?;
        let user = self
            .repository
            .create(NewUser {
                email: email.to_string(),
                password_hash: hash_password(password)?,
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                phone: None,
                role: Role::Admin,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Created bootstrap admin account");
        Ok(user.into())
    }

    async fn sign_in(&self, user: users::Model) -> UserResult<AuthResponse> {
        let tokens = self.issue_tokens(&user)?;
        self.repository
            .set_refresh_token_hash(user.id, Some(JwtAuth::fingerprint(&tokens.refresh_token)))
            .await?;

        Ok(AuthResponse {
            tokens,
            user: user.into(),
        })
    }

    fn issue_tokens(&self, user: &users::Model) -> UserResult<TokenPair> {
        self.jwt
            .issue_pair(
                user.id,
                &user.email,
                &user.full_name(),
                &[user.role.to_string()],
            )
            .map_err(|e| UserError::Internal(format!("Failed to issue tokens: {}", e)))
    }
}
