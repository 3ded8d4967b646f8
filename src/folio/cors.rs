//! Cross-origin boundary policy.
//!
//! Every response leaving the router carries the same four CORS headers,
//! including 404/405 and handler errors, so the browser client can read error
//! bodies. `OPTIONS` is answered here and never reaches a handler.

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOWED_HEADERS: &str =
    "Origin, X-Requested-With, Content-Type, Accept, Authorization, X-CSRF-TOKEN";
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS, PUT, DELETE";

#[derive(Clone, Debug)]
pub struct BoundaryPolicy {
    origin: HeaderValue,
}

impl BoundaryPolicy {
    #[must_use]
    pub const fn new(origin: HeaderValue) -> Self {
        Self { origin }
    }

    /// Stamp the CORS headers, replacing any a handler may have set.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.origin.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
    }
}

/// Middleware applying [`BoundaryPolicy`] to every request.
pub async fn enforce(
    State(policy): State<BoundaryPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    policy.apply(response.headers_mut());

    response
}
