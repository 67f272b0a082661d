//! Cross-origin admission.
//!
//! Validates the `Origin` header against a static allow-list before any
//! handler runs. A rejection here is a policy decision, not an
//! application error, and is reported as 403 with its own body.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::observability::metrics;

/// The set of origins allowed to make credentialed cross-origin requests.
///
/// Populated once at startup from configuration; read-only afterwards.
/// Membership is exact string equality, never pattern matching.
pub struct AllowedOrigins {
    set: HashSet<String>,
}

impl AllowedOrigins {
    pub fn new(origins: impl IntoIterator<Item = String>) -> Self {
        Self {
            set: origins.into_iter().collect(),
        }
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.set.contains(origin)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Middleware enforcing the origin allow-list.
///
/// Same-origin and non-browser requests carry no `Origin` header and are
/// admitted unconditionally. Allowed cross-origin requests get the origin
/// echoed back with the credentials flag; anything else is rejected
/// before reaching a handler.
pub async fn origin_middleware(
    State(allowed): State<Arc<AllowedOrigins>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .map(|value| value.to_str().map(ToString::to_string));

    let origin = match origin {
        // Same-origin and non-browser clients send no Origin header.
        None => return next.run(request).await,
        // A non-UTF-8 Origin cannot match any configured entry.
        Some(Err(_)) => return reject(request.uri().path()),
        Some(Ok(origin)) => origin,
    };

    if !allowed.contains(&origin) {
        return reject(request.uri().path());
    }

    if request.method() == Method::OPTIONS {
        return preflight_response(&origin);
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut(), &origin);
    response
}

fn reject(path: &str) -> Response {
    tracing::warn!(path = %path, "Cross-origin request rejected");
    metrics::record_cors_rejected();
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "Origin not allowed by CORS policy" })),
    )
        .into_response()
}

fn preflight_response(origin: &str) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    apply_cors_headers(headers, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("3600"),
    );
    response
}

fn apply_cors_headers(headers: &mut axum::http::HeaderMap, origin: &str) {
    // The origin was matched against configured entries, which are
    // validated as header-safe at startup.
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.append(header::VARY, HeaderValue::from_static("origin"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> AllowedOrigins {
        AllowedOrigins::new(vec![
            "https://app.example.com".to_string(),
            "http://localhost:5173".to_string(),
        ])
    }

    #[test]
    fn test_exact_match() {
        let allowed = allowed();
        assert!(allowed.contains("https://app.example.com"));
        assert!(allowed.contains("http://localhost:5173"));
    }

    #[test]
    fn test_no_pattern_matching() {
        let allowed = allowed();
        assert!(!allowed.contains("https://app.example.com.evil.com"));
        assert!(!allowed.contains("https://sub.app.example.com"));
        assert!(!allowed.contains("app.example.com"));
        assert!(!allowed.contains("https://app.example.com/"));
        assert!(!allowed.contains("HTTPS://APP.EXAMPLE.COM"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let allowed = AllowedOrigins::new(Vec::new());
        assert!(allowed.is_empty());
        assert!(!allowed.contains("https://app.example.com"));
    }
}
