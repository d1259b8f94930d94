use axum::{Router, middleware, routing::get};
use axum_helpers::optional_jwt_auth_middleware;
use domain_addresses::{AddressService, PgAddressRepository};
use domain_cart::{CartService, PgCartRepository};
use domain_categories::{CategoryService, PgCategoryRepository};
use domain_coupons::{CouponService, PgCouponRepository};
use domain_orders::{OrderService, PgOrderRepository};
use domain_payments::{PaymentService, PgPaymentRepository};
use domain_products::{PgProductRepository, ProductService};
use domain_reviews::{PgReviewRepository, ReviewService};
use domain_users::{PgUserRepository, UserService};
use domain_wishlist::{PgWishlistRepository, WishlistService};

use crate::state::AppState;

pub mod health;

/// API routes without the `/api` prefix, which `create_router` adds.
///
/// Every sub-router already carries its own state. Claims from a valid
/// bearer token are attached once here; handlers decide whether they need
/// them through the `CurrentUser` and `AdminUser` extractors.
pub fn routes(state: &AppState) -> Router {
    let db = &state.db;
    let currency = state.config.currency.as_str();
    let users = UserService::new(PgUserRepository::new(db.clone()), state.jwt.clone());

    Router::new()
        .nest("/auth", domain_users::auth_handlers::router(users.clone()))
        .nest("/users", domain_users::handlers::router(users))
        .nest(
            "/categories",
            domain_categories::handlers::router(CategoryService::new(PgCategoryRepository::new(
                db.clone(),
            ))),
        )
        .nest(
            "/products",
            domain_products::handlers::router(ProductService::new(PgProductRepository::new(
                db.clone(),
            ))),
        )
        .nest(
            "/cart",
            domain_cart::handlers::router(CartService::new(PgCartRepository::new(db.clone()))),
        )
        .nest(
            "/orders",
            domain_orders::handlers::router(OrderService::new(
                PgOrderRepository::new(db.clone()),
                currency,
            )),
        )
        .nest(
            "/payments",
            domain_payments::handlers::router(PaymentService::new(
                PgPaymentRepository::new(db.clone()),
                currency,
            )),
        )
        .nest(
            "/coupons",
            domain_coupons::handlers::router(CouponService::new(PgCouponRepository::new(
                db.clone(),
            ))),
        )
        .nest(
            "/reviews",
            domain_reviews::handlers::router(ReviewService::new(PgReviewRepository::new(
                db.clone(),
            ))),
        )
        .nest(
            "/wishlist",
            domain_wishlist::handlers::router(WishlistService::new(PgWishlistRepository::new(
                db.clone(),
            ))),
        )
        .nest(
            "/addresses",
            domain_addresses::handlers::router(AddressService::new(PgAddressRepository::new(
                db.clone(),
            ))),
        )
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            optional_jwt_auth_middleware,
        ))
}

/// `/ready` with a real database probe; merged next to the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::{body::Body, http::Request, http::StatusCode};
    use axum_helpers::{CorsConfig, JwtAuth, JwtConfig};
    use core_config::{app_info, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use std::time::Duration;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn state(db: MockDatabase) -> AppState {
        let jwt = JwtConfig::new("router-test-secret-0123456789abcdefgh").unwrap();
        AppState {
            config: Config {
                app: app_info!(),
                database: PostgresConfig::new("postgresql://localhost/shop"),
                server: ServerConfig::default(),
                jwt: jwt.clone(),
                cors: CorsConfig::Any,
                environment: Environment::Development,
                run_migrations: false,
                currency: "USD".to_string(),
                admin: None,
            },
            db: db.into_connection(),
            jwt: JwtAuth::new(&jwt),
        }
    }

    fn app(state: &AppState) -> Router {
        axum_helpers::create_router::<crate::openapi::ApiDoc>(
            routes(state),
            &state.config.cors,
            Duration::from_secs(5),
        )
        .merge(ready_router(state.clone()))
    }

    #[tokio::test]
    async fn test_admin_routes_are_guarded_through_the_stack() {
        let state = state(MockDatabase::new(DatabaseBackend::Postgres));
        let customer = state
            .jwt
            .issue_pair(
                Uuid::new_v4(),
                "jane@example.com",
                "Jane Doe",
                &["customer".to_string()],
            )
            .unwrap();

        let response = app(&state)
            .oneshot(
                Request::post("/api/categories")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Shoes"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app(&state)
            .oneshot(
                Request::post("/api/categories")
                    .header("content-type", "application/json")
                    .header(
                        "authorization",
                        format!("Bearer {}", customer.access_token),
                    )
                    .body(Body::from(r#"{"name":"Shoes"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_cart_requires_login() {
        let state = state(MockDatabase::new(DatabaseBackend::Postgres));
        let response = app(&state)
            .oneshot(Request::get("/api/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_ready_reports_database_failure() {
        let state = state(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection refused".into())]),
        );
        let response = app(&state)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["database"], "disconnected");
        assert_eq!(json["status"], "not ready");
    }
}
