//! Security Headers Middleware
//!
//! Adds protective response headers to every response, pages and API alike.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Headers set on every response
const STATIC_HEADERS: &[(&str, &str)] = &[
    ("X-Frame-Options", "DENY"),
    ("X-Content-Type-Options", "nosniff"),
    ("Referrer-Policy", "strict-origin-when-cross-origin"),
    ("Permissions-Policy", "camera=(), microphone=(), geolocation=()"),
    (
        "Content-Security-Policy",
        "default-src 'none'; frame-ancestors 'none'; base-uri 'none'; form-action 'none'",
    ),
];

const HSTS: &str = "max-age=63072000; includeSubDomains";

/// Whether to send `Strict-Transport-Security`
#[derive(Debug, Clone, Copy)]
pub struct SecurityHeaders {
    pub hsts: bool,
}

impl SecurityHeaders {
    /// HSTS is only sent when the site is served over HTTPS, otherwise
    /// browsers would pin `*.localhost` during development.
    pub fn for_public_url(public_url: &str) -> Self {
        Self {
            hsts: public_url.starts_with("https://"),
        }
    }
}

/// Middleware that adds security headers to all responses
pub async fn security_headers_middleware(
    State(settings): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in STATIC_HEADERS {
        headers.insert(*name, HeaderValue::from_static(value));
    }

    if settings.hsts {
        headers.insert(header::STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(HSTS));
    }

    // The same path renders different sites per host
    headers.append(header::VARY, HeaderValue::from_static("Host"));

    // Only add if not already set by the handler
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, private"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, routing::get, Router};
    use tower::ServiceExt;

    async fn test_handler() -> &'static str {
        "ok"
    }

    async fn cached_handler() -> ([(header::HeaderName, &'static str); 1], &'static str) {
        ([(header::CACHE_CONTROL, "public, max-age=60")], "ok")
    }

    fn app(settings: SecurityHeaders) -> Router {
        Router::new()
            .route("/", get(test_handler))
            .route("/cached", get(cached_handler))
            .layer(axum::middleware::from_fn_with_state(
                settings,
                security_headers_middleware,
            ))
    }

    #[tokio::test]
    async fn test_security_headers_are_added() {
        let response = app(SecurityHeaders::for_public_url("https://example.com"))
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
        assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
        assert_eq!(
            headers.get("Referrer-Policy").unwrap(),
            "strict-origin-when-cross-origin"
        );
        assert_eq!(headers.get(header::STRICT_TRANSPORT_SECURITY).unwrap(), HSTS);
        assert_eq!(headers.get(header::VARY).unwrap(), "Host");
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            "no-store, private"
        );
        assert!(headers.get("Content-Security-Policy").is_some());
    }

    #[tokio::test]
    async fn test_no_hsts_over_plain_http() {
        let response = app(SecurityHeaders::for_public_url("http://localhost:3000"))
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::STRICT_TRANSPORT_SECURITY)
            .is_none());
        assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");
    }

    #[tokio::test]
    async fn test_handler_cache_control_is_kept() {
        let response = app(SecurityHeaders { hsts: false })
            .oneshot(
                HttpRequest::builder()
                    .uri("/cached")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=60"
        );
    }
}
