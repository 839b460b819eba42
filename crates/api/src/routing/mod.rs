//! Subdomain-based site routing
//!
//! This module maps incoming Host headers to one of three sites, enabling
//! URLs like:
//! - Main site: example.com, www.example.com
//! - App dashboard: app.example.com
//! - Tenant sites: acme.example.com (served from the `/tenant` routes)

mod middleware;
mod subdomain;

pub use middleware::{subdomain_router, PathMatcher, DEFAULT_BYPASS_PREFIXES};
pub use subdomain::{
    extract_subdomain, RoutingDecision, SiteClass, APP_PATH_PREFIX, APP_SUBDOMAIN,
    RESERVED_SUBDOMAINS, TENANT_PATH_PREFIX, TENANT_SUBDOMAIN_HEADER, WWW_SUBDOMAIN,
};
