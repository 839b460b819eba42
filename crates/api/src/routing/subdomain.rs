//! Host-to-Site Classification
//!
//! Classifies an incoming Host header into one of three site classes and
//! derives the rewritten path page handlers are routed on:
//! - Main site: example.com, www.example.com -> path unchanged
//! - App site: app.example.com -> /app/...
//! - Tenant site: acme.example.com -> /tenant/..., plus `x-tenant-subdomain: acme`
//!
//! Local development hosts (anything with a `localhost` label) need only two
//! labels, so `acme.localhost:3000` is a tenant site.
//!
//! Classification never fails; anything unrecognized is the main site.

use serde::Serialize;

/// Header carrying the resolved tenant label to downstream handlers
pub const TENANT_SUBDOMAIN_HEADER: &str = "x-tenant-subdomain";

/// Subdomain that selects the app dashboard
pub const APP_SUBDOMAIN: &str = "app";

/// Subdomain that is an alias for the main site
pub const WWW_SUBDOMAIN: &str = "www";

/// Labels a tenant can never claim, since the router would not send traffic to it
pub const RESERVED_SUBDOMAINS: &[&str] = &[APP_SUBDOMAIN, WWW_SUBDOMAIN];

pub const APP_PATH_PREFIX: &str = "/app";
pub const TENANT_PATH_PREFIX: &str = "/tenant";

const LOCALHOST: &str = "localhost";

/// Which site a request belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "site", content = "subdomain", rename_all = "snake_case")]
pub enum SiteClass {
    MainSite,
    AppSite,
    TenantSite(String),
}

/// Per-request outcome of subdomain routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    /// Host header as received
    pub raw_host: String,
    /// Leftmost label when it selects a site, `None` for the main site
    pub subdomain_label: Option<String>,
    pub classification: SiteClass,
    /// Path page routing should use
    pub rewritten_path: String,
    /// Whether `rewritten_path` differs from the request path
    rewritten: bool,
}

impl RoutingDecision {
    /// Classify `host` and derive the path for `path`.
    ///
    /// Already-prefixed paths are left alone, so resolving a rewritten path
    /// again is a no-op.
    pub fn resolve(host: &str, path: &str) -> Self {
        let subdomain = extract_subdomain(host);

        let classification = match subdomain {
            None => SiteClass::MainSite,
            Some(APP_SUBDOMAIN) => SiteClass::AppSite,
            Some(label) => SiteClass::TenantSite(label.to_string()),
        };

        let prefix = match classification {
            SiteClass::MainSite => None,
            SiteClass::AppSite => Some(APP_PATH_PREFIX),
            SiteClass::TenantSite(_) => Some(TENANT_PATH_PREFIX),
        };

        let (rewritten_path, rewritten) = match prefix {
            Some(prefix) if !path.starts_with(prefix) => (prefix_path(prefix, path), true),
            _ => (path.to_string(), false),
        };

        Self {
            raw_host: host.to_string(),
            subdomain_label: subdomain.map(str::to_string),
            classification,
            rewritten_path,
            rewritten,
        }
    }

    /// Whether the request path must be replaced
    pub fn is_rewrite(&self) -> bool {
        self.rewritten
    }

    /// Tenant label to forward in [`TENANT_SUBDOMAIN_HEADER`], tenant sites only
    pub fn tenant_subdomain(&self) -> Option<&str> {
        match &self.classification {
            SiteClass::TenantSite(label) => Some(label),
            _ => None,
        }
    }
}

/// Extract the site-selecting subdomain from a Host header value.
///
/// Returns `None` for the main site: too few labels, an empty first label,
/// or `www`. Comparisons are case-sensitive.
pub fn extract_subdomain(host: &str) -> Option<&str> {
    // Remove port if present
    let host = host.split(':').next().unwrap_or(host);
    let labels: Vec<&str> = host.split('.').collect();

    let candidate = if labels.contains(&LOCALHOST) {
        // Format: subdomain.localhost
        match labels.as_slice() {
            [first, _, ..] if *first != LOCALHOST => Some(*first),
            _ => None,
        }
    } else if labels.len() >= 3 {
        // Need at least 3 labels: subdomain.domain.tld
        Some(labels[0])
    } else {
        None
    };

    candidate.filter(|label| !label.is_empty() && *label != WWW_SUBDOMAIN)
}

/// Join a section prefix and a request path. The root path maps to the
/// bare prefix so it lands on the section's index route.
fn prefix_path(prefix: &str, path: &str) -> String {
    match path {
        "" | "/" => prefix.to_string(),
        p if p.starts_with('/') => format!("{}{}", prefix, p),
        p => format!("{}/{}", prefix, p),
    }
}
