use axum::Json;
use serde_json::{Value, json};

/// GET /info: build metadata, public.
pub async fn info() -> Json<Value> {
    Json(json!({
        "app": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}
