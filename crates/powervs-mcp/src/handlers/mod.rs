//! HTTP handlers.
//!
//! `/health` is a plain axum handler; `/mcp` is served by rmcp's streamable
//! HTTP service wrapping [`PowerVsTools`].

mod tools;

pub use tools::PowerVsTools;

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}
