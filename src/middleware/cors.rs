//! CORS preflight responder.
//!
//! Applied to the whole Router (routes and fallback), so every `OPTIONS`
//! request is answered here before route matching and before the bearer gate.
//! Preflights never need a token.
//!
//! Policy:
//! - Development: Allow-Origin: *, without credentials.
//! - Production: exact allowlist from `CORS_ALLOWED_ORIGINS`, without credentials.
//!   An empty allowlist allows no origin.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::AppEnv;
use crate::middleware::http::REQUEST_ID_HEADER;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(60 * 10);

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

pub fn apply(router: Router, app_env: AppEnv, allowed_origins: &[String]) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let cors = CorsLayer::new()
        .allow_origin(allow_origin(app_env, allowed_origins))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            request_id.clone(),
        ])
        // lets browser clients quote the id when reporting a failed call
        .expose_headers([request_id])
        .max_age(PREFLIGHT_MAX_AGE);

    router.layer(cors)
}

fn allow_origin(app_env: AppEnv, allowed_origins: &[String]) -> AllowOrigin {
    if !app_env.is_production() {
        return AllowOrigin::any();
    }

    let allowed: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|origin| {
            // "*" is never an exact origin; a wildcard list entry is a misconfiguration
            let wildcard = origin.as_str() == "*";
            if wildcard {
                tracing::warn!("ignoring \"*\" in production CORS allowlist");
            }
            !wildcard
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring CORS origin that is not a valid header value");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        tracing::warn!("production CORS allowlist is empty; cross-origin calls will be refused");
    }

    AllowOrigin::list(allowed)
}
