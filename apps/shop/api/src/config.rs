use axum_helpers::{CorsConfig, JwtConfig};
use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_flag, env_or_default, server::ServerConfig,
};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Credentials of the account promoted to admin at startup
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Everything the shop API reads from the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
    /// `RUN_MIGRATIONS`, default true
    pub run_migrations: bool,
    /// ISO 4217 code recorded on payments, `SHOP_CURRENCY` (default USD)
    pub currency: String,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;
        let cors = CorsConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            jwt,
            cors,
            environment,
            run_migrations: env_flag("RUN_MIGRATIONS", true)?,
            currency: currency_from_env()?,
            admin: admin_from_env(),
        })
    }
}

fn currency_from_env() -> Result<String, ConfigError> {
    let currency = env_or_default("SHOP_CURRENCY", "USD").trim().to_ascii_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::Invalid {
            key: "SHOP_CURRENCY".to_string(),
            details: format!("expected a three-letter currency code, got '{}'", currency),
        });
    }
    Ok(currency)
}

fn admin_from_env() -> Option<AdminBootstrap> {
    let email = std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.trim().is_empty())?;
    let password = std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty())?;
    Some(AdminBootstrap {
        email: email.trim().to_lowercase(),
        password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [(&str, Option<&str>); 3] = [
        ("DATABASE_URL", Some("postgresql://localhost/shop")),
        ("JWT_SECRET", Some("config-test-secret-with-enough-length!")),
        ("CORS_ALLOWED_ORIGIN", Some("http://localhost:3000")),
    ];

    fn with_env<F: FnOnce()>(extra: &[(&str, Option<&str>)], f: F) {
        let overridden = |key: &str| extra.iter().any(|(k, _)| *k == key);
        let mut vars: Vec<(&str, Option<&str>)> = REQUIRED
            .into_iter()
            .filter(|(key, _)| !overridden(key))
            .collect();
        for key in ["SHOP_CURRENCY", "RUN_MIGRATIONS", "ADMIN_EMAIL", "ADMIN_PASSWORD"] {
            if !overridden(key) {
                vars.push((key, None));
            }
        }
        vars.extend_from_slice(extra);
        temp_env::with_vars(vars, f);
    }

    #[test]
    fn test_defaults() {
        with_env(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.app.name, "shop_api");
            assert_eq!(config.currency, "USD");
            assert!(config.run_migrations);
            assert!(config.admin.is_none());
        });
    }

    #[test]
    fn test_currency_is_normalized_and_checked() {
        with_env(&[("SHOP_CURRENCY", Some(" eur "))], || {
            assert_eq!(Config::from_env().unwrap().currency, "EUR");
        });
        with_env(&[("SHOP_CURRENCY", Some("EURO"))], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("SHOP_CURRENCY"));
        });
    }

    #[test]
    fn test_admin_bootstrap_needs_both_values() {
        with_env(&[("ADMIN_EMAIL", Some("Root@Shop.test"))], || {
            assert!(Config::from_env().unwrap().admin.is_none());
        });
        with_env(
            &[
                ("ADMIN_EMAIL", Some("Root@Shop.test")),
                ("ADMIN_PASSWORD", Some("Sup3r-secret!")),
            ],
            || {
                let admin = Config::from_env().unwrap().admin.unwrap();
                assert_eq!(admin.email, "root@shop.test");
                assert!(!format!("{:?}", admin).contains("Sup3r"));
            },
        );
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        with_env(&[("JWT_SECRET", None), ("RUN_MIGRATIONS", Some("false"))], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }
}
