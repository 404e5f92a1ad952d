use crate::services::download_gateway::{DownloadError, DEFAULT_EXPIRATION_MINUTES};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Path of the redemption endpoint, returned to callers with each token.
pub const DOWNLOAD_FILE_PATH: &str = "/download/file";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[serde(default)]
    pub document_id: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i32,
}

fn default_expiration_minutes() -> i32 {
    DEFAULT_EXPIRATION_MINUTES
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub document_id: String,
    pub expires_at: DateTime<Utc>,
    pub download_url: String,
    pub expiration_minutes: i32,
}

#[derive(Debug, Deserialize)]
pub struct FileRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub token: Option<String>,
}

fn invalid_body(rejection: JsonRejection) -> DownloadError {
    tracing::debug!(error = %rejection, "Rejected download request body");
    DownloadError::Validation("invalid request body")
}

/// Issue a short-lived download token for a document.
pub async fn request_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, DownloadError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let issued = state
        .downloads
        .issue_token(&request.document_id, request.expiration_minutes)
        .await?;

    Ok(Json(TokenResponse {
        success: true,
        token: issued.token,
        document_id: issued.document_id,
        expires_at: issued.expires_at,
        download_url: DOWNLOAD_FILE_PATH.to_string(),
        expiration_minutes: issued.expiration_minutes,
    }))
}

/// Redeem a token passed in a JSON body.
pub async fn download_file(
    State(state): State<AppState>,
    payload: Result<Json<FileRequest>, JsonRejection>,
) -> Result<Response, DownloadError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let delivery = state.downloads.redeem_token(&request.token).await?;
    Ok(delivery.into_response())
}

/// Redeem a token passed as `?token=`, for plain links.
///
/// A missing token answers with a plain-text body, unlike the JSON error of
/// the POST variant; existing link consumers depend on it.
pub async fn download_file_via_get(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Response {
    let token = query.token.unwrap_or_default();
    if token.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "token is required").into_response();
    }

    match state.downloads.redeem_token(&token).await {
        Ok(delivery) => delivery.into_response(),
        Err(e) => e.into_response(),
    }
}
