use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,          // User ID
    pub email: String,      // User email
    pub name: String,       // Display name
    pub roles: Vec<String>, // User roles
    pub token_type: TokenType,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
    pub jti: String,
}

/// Access and refresh token returned by login, register and refresh.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues and verifies HS256 tokens. Cheap to clone.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(
            access_ttl = config.access_ttl_secs,
            refresh_ttl = config.refresh_ttl_secs,
            "JWT auth initialized"
        );
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl: config.access_ttl_secs,
            refresh_ttl: config.refresh_ttl_secs,
        }
    }

    pub fn access_ttl(&self) -> i64 {
        self.access_ttl
    }

    /// Issue an access token and a refresh token for the same subject.
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
        roles: &[String],
    ) -> eyre::Result<TokenPair> {
        let access_token = self.create_token(
            user_id,
            email,
            name,
            roles,
            TokenType::Access,
            self.access_ttl,
        )?;
        let refresh_token = self.create_token(
            user_id,
            email,
            name,
            roles,
            TokenType::Refresh,
            self.refresh_ttl,
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl,
        })
    }

    fn create_token(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
        roles: &[String],
        token_type: TokenType,
        ttl_seconds: i64,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id,
            email: email.to_string(),
            name: name.to_string(),
            roles: roles.to_vec(),
            token_type,
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify signature and expiry, and require the given token type.
    pub fn verify(&self, token: &str, expected: TokenType) -> eyre::Result<JwtClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<JwtClaims>(token, &self.decoding, &validation)?.claims;
        if claims.token_type != expected {
            eyre::bail!("expected {:?} token, got {:?}", expected, claims.token_type);
        }
        Ok(claims)
    }

    /// SHA-256 fingerprint of a token, stored server-side so refresh tokens can be revoked.
    pub fn fingerprint(token: &str) -> String {
        const_hex::encode(Sha256::digest(token.as_bytes()))
    }

    #[cfg(test)]
    pub(crate) fn create_expired_access_token(&self, user_id: Uuid) -> eyre::Result<String> {
        self.create_token(user_id, "x@example.com", "x", &[], TokenType::Access, -120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("unit-test-secret-that-is-long-enough!!").unwrap())
    }

    #[test]
    fn test_issue_pair_roundtrip() {
        let auth = auth();
        let user_id = Uuid::new_v4();
        let roles = vec!["customer".to_string()];
        let pair = auth
            .issue_pair(user_id, "jane@example.com", "Jane Doe", &roles)
            .unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);

        let claims = auth.verify(&pair.access_token, TokenType::Access).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.roles, roles);

        let refresh = auth.verify(&pair.refresh_token, TokenType::Refresh).unwrap();
        assert!(refresh.exp > claims.exp);
        assert_ne!(refresh.jti, claims.jti);
    }

    #[test]
    fn test_token_type_is_enforced() {
        let auth = auth();
        let pair = auth
            .issue_pair(Uuid::new_v4(), "a@example.com", "A", &[])
            .unwrap();
        assert!(auth.verify(&pair.refresh_token, TokenType::Access).is_err());
        assert!(auth.verify(&pair.access_token, TokenType::Refresh).is_err());
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let other =
            JwtAuth::new(&JwtConfig::new("another-secret-that-is-also-long-enough").unwrap());
        let pair = other
            .issue_pair(Uuid::new_v4(), "a@example.com", "A", &[])
            .unwrap();
        assert!(auth().verify(&pair.access_token, TokenType::Access).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = auth();
        let token = auth.create_expired_access_token(Uuid::new_v4()).unwrap();
        assert!(auth.verify(&token, TokenType::Access).is_err());
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = JwtAuth::fingerprint("token");
        assert_eq!(a, JwtAuth::fingerprint("token"));
        assert_ne!(a, JwtAuth::fingerprint("token2"));
        assert_eq!(a.len(), 64);
    }
}
