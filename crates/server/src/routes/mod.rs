//! API route handlers
//!
//! - `health`: liveness and readiness
//! - `matching`: name matching over query string and JSON body

pub mod health;
pub mod matching;

use crate::error::ServerError;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// # Response
///
/// ```json
/// {
///   "name": "namematch",
///   "version": "0.1.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": "namematch",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /match",
            "POST /match",
            "/health",
            "/ready"
        ]
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
