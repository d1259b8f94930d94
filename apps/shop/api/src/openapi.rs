use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "Storefront backend: catalog, cart, checkout, payments, coupons, reviews, wishlists and addresses"
    ),
    servers((url = "/api", description = "API base path")),
    modifiers(&BearerAuth),
    nest(
        (path = "/auth", api = domain_users::auth_handlers::ApiDoc),
        (path = "/users", api = domain_users::handlers::ApiDoc),
        (path = "/categories", api = domain_categories::handlers::ApiDoc),
        (path = "/products", api = domain_products::handlers::ApiDoc),
        (path = "/cart", api = domain_cart::handlers::ApiDoc),
        (path = "/orders", api = domain_orders::handlers::ApiDoc),
        (path = "/payments", api = domain_payments::handlers::ApiDoc),
        (path = "/coupons", api = domain_coupons::handlers::ApiDoc),
        (path = "/reviews", api = domain_reviews::handlers::ApiDoc),
        (path = "/wishlist", api = domain_wishlist::handlers::ApiDoc),
        (path = "/addresses", api = domain_addresses::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
