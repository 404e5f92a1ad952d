use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "driftmind-web",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Realtime transport resolved at startup. Never exposes the connection string.
pub async fn info(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "mode": state.transport.description(),
        "managed": state.transport.is_managed(),
        "applicationName": state.settings.realtime.application_name,
    }))
}
