/*
 * Responsibility
 * - URL 構造を定義
 * - 運用系 (/health, /info) と /api/v1 を分ける
 * - authority が必要な範囲は middleware::auth::require で route_layer として掛ける
 */
use axum::{Router, routing::get};

use crate::middleware::auth::require;
use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    info::info,
    me::{admin_ping, me},
};

/// Operational endpoints, mounted at the root. Reachable anonymously through
/// the default public-path allowlist.
pub fn operational_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ping", get(health))
        .route("/info", get(info))
}

pub fn routes() -> Router<AppState> {
    let admin = require::authority(
        Router::new().route("/admin/ping", get(admin_ping)),
        "ROLE_ADMIN",
    );

    Router::new().route("/me", get(me)).merge(admin)
}
