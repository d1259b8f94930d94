use core_config::{ConfigError, FromEnv, env_parse, env_required};

/// Default access token lifetime (15 minutes)
pub const ACCESS_TOKEN_TTL: i64 = 900;
/// Default refresh token lifetime (7 days)
pub const REFRESH_TOKEN_TTL: i64 = 604_800;

const MIN_SECRET_LEN: usize = 32;

/// JWT settings.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_ACCESS_TTL_SECS` (default 900)
/// - `JWT_REFRESH_TTL_SECS` (default 604800)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret(&secret)?;
        Ok(Self {
            secret,
            access_ttl_secs: ACCESS_TOKEN_TTL,
            refresh_ttl_secs: REFRESH_TOKEN_TTL,
        })
    }
}

fn check_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {} characters (got {}). Generate one with: openssl rand -base64 32",
                MIN_SECRET_LEN,
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        check_secret(&secret)?;

        let access_ttl_secs = env_parse("JWT_ACCESS_TTL_SECS", ACCESS_TOKEN_TTL)?;
        let refresh_ttl_secs = env_parse("JWT_REFRESH_TTL_SECS", REFRESH_TOKEN_TTL)?;

        if access_ttl_secs <= 0 || refresh_ttl_secs <= access_ttl_secs {
            return Err(ConfigError::Invalid {
                key: "JWT_REFRESH_TTL_SECS".to_string(),
                details: "token lifetimes must be positive and refresh must outlive access"
                    .to_string(),
            });
        }

        Ok(Self {
            secret,
            access_ttl_secs,
            refresh_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_new_rejects_short_secret() {
        assert!(JwtConfig::new("short").is_err());
        assert!(JwtConfig::new(SECRET).is_ok());
    }

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_ACCESS_TTL_SECS", None),
                ("JWT_REFRESH_TTL_SECS", None),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.access_ttl_secs, ACCESS_TOKEN_TTL);
                assert_eq!(config.refresh_ttl_secs, REFRESH_TOKEN_TTL);
            },
        );
    }

    #[test]
    fn test_from_env_missing_secret() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_from_env_rejects_refresh_shorter_than_access() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_ACCESS_TTL_SECS", Some("600")),
                ("JWT_REFRESH_TTL_SECS", Some("60")),
            ],
            || {
                assert!(JwtConfig::from_env().is_err());
            },
        );
    }
}
