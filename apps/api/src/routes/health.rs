use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service name, time, and version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": "hireview-api",
        "time": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
