//! TenantKit API Library
//!
//! HTTP server for a multi-tenant site: subdomain routing in front of the
//! main site, the app dashboard, tenant sites and the JSON API.

pub mod config;
pub mod error;
pub mod routes;
pub mod routing;
pub mod security;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::{create_app, create_router};
pub use routing::{extract_subdomain, RoutingDecision, SiteClass};
pub use state::AppState;
