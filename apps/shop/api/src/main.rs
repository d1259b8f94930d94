use axum_helpers::{JwtAuth, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::{PgUserRepository, UserService};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;
    }

    let jwt = JwtAuth::new(&config.jwt);

    if let Some(admin) = &config.admin {
        UserService::new(PgUserRepository::new(db.clone()), jwt.clone())
            .ensure_admin(&admin.email, &admin.password)
            .await
            .map_err(|e| eyre::eyre!("Admin bootstrap failed: {}", e))?;
    }

    let state = AppState { config, db, jwt };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(
        api_routes,
        &state.config.cors,
        state.config.server.request_timeout,
    );

    // /health is liveness only, /ready pings the database
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(currency = %state.config.currency, "Starting shop API");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shop API shutdown complete");
    Ok(())
}
