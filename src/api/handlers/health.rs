/*
 * Responsibility
 * - GET /api/health (疎通用)
 * - middleware (bearer) を通さない public route
 */
use axum::http::StatusCode;

pub const HEALTH_BODY: &str = "Health good";

pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTH_BODY)
}
