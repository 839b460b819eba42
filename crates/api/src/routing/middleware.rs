//! Subdomain routing middleware
//!
//! Applies a [`RoutingDecision`] to every inbound request before route
//! matching. This layer must wrap the page router from the outside (see
//! `routes::create_app`), otherwise axum would already have matched the
//! original path.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Uri},
    middleware::Next,
    response::Response,
};

use super::subdomain::{RoutingDecision, TENANT_SUBDOMAIN_HEADER};

/// Prefixes served as static assets unless overridden by configuration
pub const DEFAULT_BYPASS_PREFIXES: &[&str] = &["/static/", "/favicon.ico"];

/// Infrastructure and API paths, identical for every host. These are served
/// by this same process, so `acme.example.com/api/...` is not rewritten to
/// `/tenant/api/...` the way other tenant paths are.
const SERVICE_PATHS: &[&str] = &["/health", "/api"];

/// Image extensions served as static files
const ASSET_EXTENSIONS: &[&str] = &["svg", "png", "jpg", "jpeg", "gif", "webp"];

/// Decides which paths the subdomain router leaves untouched
#[derive(Debug, Clone)]
pub struct PathMatcher {
    bypass_prefixes: Vec<String>,
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_BYPASS_PREFIXES.iter().map(|p| p.to_string()).collect())
    }
}

impl PathMatcher {
    pub fn new(bypass_prefixes: Vec<String>) -> Self {
        Self { bypass_prefixes }
    }

    /// True if `path` must not be classified or rewritten
    pub fn bypasses(&self, path: &str) -> bool {
        if SERVICE_PATHS
            .iter()
            .any(|p| path == *p || path.strip_prefix(p).is_some_and(|rest| rest.starts_with('/')))
        {
            return true;
        }

        if self.bypass_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return true;
        }

        let last_segment = path.rsplit('/').next().unwrap_or(path);
        last_segment
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ASSET_EXTENSIONS.contains(&ext))
    }
}

/// Middleware that classifies the request host and rewrites the path.
///
/// - Strips any client-supplied `x-tenant-subdomain` header
/// - Rewrites the URI path (query string preserved) for app and tenant hosts
/// - Forwards the tenant label in `x-tenant-subdomain` on the request and
///   echoes it on the response
/// - Stores the [`RoutingDecision`] as a request extension
///
/// Never rejects a request: malformed hosts fall through as the main site.
pub async fn subdomain_router(
    State(matcher): State<Arc<PathMatcher>>,
    mut request: Request,
    next: Next,
) -> Response {
    // The routing header is only trusted when we set it
    request.headers_mut().remove(TENANT_SUBDOMAIN_HEADER);

    if matcher.bypasses(request.uri().path()) {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default()
        .to_string();

    let decision = RoutingDecision::resolve(&host, request.uri().path());

    tracing::debug!(
        host = %decision.raw_host,
        subdomain = decision.subdomain_label.as_deref().unwrap_or("none"),
        path = %request.uri().path(),
        rewritten_path = %decision.rewritten_path,
        "Subdomain routing"
    );

    if decision.is_rewrite() {
        match rewrite_uri(request.uri(), &decision.rewritten_path) {
            Some(uri) => *request.uri_mut() = uri,
            None => {
                tracing::warn!(
                    path = %decision.rewritten_path,
                    "Rewritten path is not a valid URI, passing request through"
                );
            }
        }
    }

    let tenant_header = decision
        .tenant_subdomain()
        .and_then(|label| HeaderValue::from_str(label).ok());

    if let Some(value) = &tenant_header {
        request
            .headers_mut()
            .insert(TENANT_SUBDOMAIN_HEADER, value.clone());
    }
    request.extensions_mut().insert(decision);

    let mut response = next.run(request).await;

    if let Some(value) = tenant_header {
        response.headers_mut().insert(TENANT_SUBDOMAIN_HEADER, value);
    }

    response
}

/// Replace the path of `uri`, keeping scheme, authority and query
fn rewrite_uri(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}
