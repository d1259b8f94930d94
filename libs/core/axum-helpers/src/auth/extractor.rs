use super::jwt::JwtClaims;
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

/// The authenticated caller, read from the claims the auth middleware attached.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl CurrentUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

impl From<JwtClaims> for CurrentUser {
    fn from(claims: JwtClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            roles: claims.roles,
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .cloned()
            .map(CurrentUser::from)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// A caller holding the `admin` role. 401 without a token, 403 otherwise.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::info!(user_id = %user.id, "Admin route denied");
            return Err(AppError::Forbidden("Admin role required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str]) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            name: "A".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_role_checks_are_case_insensitive() {
        assert!(user(&["ADMIN"]).is_admin());
        assert!(!user(&["customer"]).is_admin());
        assert!(user(&["customer"]).has_role("Customer"));
    }

    #[tokio::test]
    async fn test_admin_extractor_statuses() {
        use axum::http::{Request, StatusCode};

        let (mut parts, _) = Request::new(()).into_parts();
        let err = AdminUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let (mut parts, _) = Request::new(()).into_parts();
        parts.extensions.insert(JwtClaims {
            sub: Uuid::new_v4(),
            email: "c@example.com".into(),
            name: "C".into(),
            roles: vec!["customer".into()],
            token_type: crate::auth::TokenType::Access,
            exp: 0,
            iat: 0,
            jti: "j".into(),
        });
        let err = AdminUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
