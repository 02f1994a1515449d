/*
 * Responsibility
 * - GET /health, GET /health/ping (疎通用)
 * - 公開パス (allowlist) なので token 無しで到達できる
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "UP"})))
}
