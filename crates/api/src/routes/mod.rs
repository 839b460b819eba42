//! API routes

pub mod health;
pub mod pages;
pub mod posts;
pub mod seed;
pub mod tenants;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    routing::subdomain_router,
    security::{security_headers_middleware, SecurityHeaders},
    state::AppState,
};

/// Create all routes, mounted on their rewritten paths
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Main site, app dashboard (/app) and tenant sites (/tenant)
    let page_routes = Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/dashboard", get(pages::dashboard))
        .route("/app", get(pages::app_home))
        .route("/app/settings", get(pages::app_settings))
        .route("/tenant", get(pages::tenant_home))
        .route("/tenant/about", get(pages::tenant_about))
        .route("/tenant/demo", get(pages::tenant_demo));

    let api_v1_routes = Router::new()
        // Tenant routes
        .route("/tenants", get(tenants::list_active))
        .route("/tenants", post(tenants::create))
        .route("/tenants/by-subdomain/:subdomain", get(tenants::get_by_subdomain))
        .route("/tenants/:tenant_id/settings", patch(tenants::update_settings))
        .route("/tenants/:tenant_id/deactivate", post(tenants::deactivate))
        // User routes
        .route("/tenants/:tenant_id/users", get(users::list_users))
        .route("/tenants/:tenant_id/users", post(users::create_user))
        .route("/tenants/:tenant_id/users/by-email", get(users::get_by_email))
        .route("/users/:user_id/role", patch(users::update_role))
        // Post routes
        .route("/tenants/:tenant_id/posts", get(posts::list_posts))
        .route("/tenants/:tenant_id/posts", post(posts::create_post))
        // Development seeding (404 unless ENABLE_DEV_SEED)
        .route("/dev/seed", post(seed::seed).delete(seed::clear));

    let body_limit = state.config.max_request_body_bytes;

    Router::new()
        .merge(health_routes)
        .merge(page_routes)
        .nest("/api/v1", api_v1_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Create the full application: subdomain routing in front of [`create_router`].
///
/// `Router::layer` middleware runs after route matching, so the subdomain
/// rewrite wraps the inner router as a service and the outer router hands
/// every request to it.
pub fn create_app(state: AppState) -> Router {
    let security = SecurityHeaders::for_public_url(&state.config.public_url);
    let subdomain_layer =
        middleware::from_fn_with_state(state.path_matcher.clone(), subdomain_router);

    let routed = tower::Layer::layer(&subdomain_layer, create_router(state));

    Router::new()
        .fallback_service(routed)
        .layer(middleware::from_fn_with_state(
            security,
            security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
