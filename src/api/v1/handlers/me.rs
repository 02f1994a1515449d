/*
 * Responsibility
 * - GET /api/v1/me: 認証済み principal と authorities を返す
 * - GET /api/v1/admin/ping: ROLE_ADMIN が必要 (routes 側で require::authority)
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::Identity};

pub async fn me(Identity(identity): Identity) -> Json<MeResponse> {
    Json(MeResponse::from(&identity))
}

pub async fn admin_ping(Identity(identity): Identity) -> Json<MeResponse> {
    tracing::info!(principal = %identity.principal(), "admin ping");
    Json(MeResponse::from(&identity))
}
