pub mod app;
pub mod documents;
pub mod download;
pub mod metrics;
pub mod search;
pub mod upload;

use crate::services::api_client::ClientError;
use reqwest::StatusCode;
use service_core::error::AppError;

/// Map a failed upstream call onto the collaborator error surface.
pub(crate) fn upstream_error(err: ClientError) -> AppError {
    match err {
        ClientError::Status(status) if status == StatusCode::NOT_FOUND => {
            AppError::NotFound(anyhow::anyhow!("Resource not found"))
        }
        ClientError::Transport(_) => AppError::BadGateway("DriftMind API unreachable".to_string()),
        other => AppError::BadGateway(other.to_string()),
    }
}
