#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::Request,
    response::Response,
    Router,
};
use driftmind_web::config::{
    DriftMindApiSettings, EndpointSettings, RealtimeSettings, ServerSettings, Settings,
    TelemetrySettings,
};
use driftmind_web::startup::build_router;
use driftmind_web::AppState;
use tower::util::ServiceExt;

/// Nothing listens here; connections are refused immediately.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1";

pub fn test_settings(upstream: &str) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_size_mb: 1,
        },
        driftmind_api: DriftMindApiSettings {
            base_url: upstream.to_string(),
            endpoints: EndpointSettings::default(),
        },
        realtime: RealtimeSettings::default(),
        telemetry: TelemetrySettings::default(),
    }
}

pub fn test_app(upstream: &str) -> Router {
    build_router(AppState::new(test_settings(upstream)))
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Failed to parse JSON")
}
