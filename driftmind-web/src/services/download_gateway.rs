//! Token-gated file downloads.
//!
//! The gateway validates inbound requests, clamps the token lifetime, relays
//! issuance and redemption to the DriftMind API and shapes the file response
//! headers. Tokens are opaque here: they are forwarded, never inspected.

use crate::models::{DownloadTokenResponse, DownloadedFile};
use crate::services::api_client::{ClientError, DriftMindClient};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_EXPIRATION_MINUTES: i32 = 15;
pub const MAX_EXPIRATION_MINUTES: i32 = 60;
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Upstream calls the gateway depends on.
#[async_trait]
pub trait DownloadBackend: Send + Sync {
    async fn request_download_token(
        &self,
        document_id: &str,
        expiration_minutes: i32,
    ) -> Result<DownloadTokenResponse, ClientError>;

    async fn fetch_file(&self, token: &str) -> Result<DownloadedFile, ClientError>;
}

#[async_trait]
impl DownloadBackend for DriftMindClient {
    async fn request_download_token(
        &self,
        document_id: &str,
        expiration_minutes: i32,
    ) -> Result<DownloadTokenResponse, ClientError> {
        DriftMindClient::request_download_token(self, document_id, expiration_minutes).await
    }

    async fn fetch_file(&self, token: &str) -> Result<DownloadedFile, ClientError> {
        DriftMindClient::fetch_file(self, token).await
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("token could not be generated")]
    TokenNotIssued,

    #[error("download failed — token invalid or expired")]
    RedemptionFailed,

    #[error("internal server error")]
    Internal,
}

impl DownloadError {
    pub fn status(&self) -> StatusCode {
        match self {
            DownloadError::Validation(_)
            | DownloadError::TokenNotIssued
            | DownloadError::RedemptionFailed => StatusCode::BAD_REQUEST,
            DownloadError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({
                "success": false,
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// A token ready to be handed to the caller.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub document_id: String,
    pub expires_at: DateTime<Utc>,
    pub expiration_minutes: i32,
}

/// A redeemed file with its response headers already derived.
#[derive(Debug, Clone)]
pub struct FileDelivery {
    pub bytes: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
    pub content_disposition: HeaderValue,
}

impl IntoResponse for FileDelivery {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, self.content_type)],
            [(header::CONTENT_DISPOSITION, self.content_disposition)],
            self.bytes,
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct DownloadGateway {
    backend: Arc<dyn DownloadBackend>,
}

impl DownloadGateway {
    pub fn new(backend: Arc<dyn DownloadBackend>) -> Self {
        Self { backend }
    }

    pub async fn issue_token(
        &self,
        document_id: &str,
        requested_expiration_minutes: i32,
    ) -> Result<IssuedToken, DownloadError> {
        if document_id.trim().is_empty() {
            return Err(DownloadError::Validation("documentId is required"));
        }

        let expiration_minutes = effective_expiration_minutes(requested_expiration_minutes);

        let response = self
            .backend
            .request_download_token(document_id, expiration_minutes)
            .await
            .map_err(|e| {
                if e.is_transport() {
                    tracing::error!(document_id = %document_id, error = %e, "Error generating download token");
                    DownloadError::Internal
                } else {
                    tracing::warn!(document_id = %document_id, error = %e, "Failed to generate download token");
                    DownloadError::TokenNotIssued
                }
            })?;

        tracing::info!(
            document_id = %response.document_id,
            expiration_minutes,
            expires_at = %response.expires_at,
            "Download token issued"
        );

        Ok(IssuedToken {
            token: response.token,
            document_id: response.document_id,
            expires_at: response.expires_at,
            expiration_minutes,
        })
    }

    /// Exchange a token for its file.
    ///
    /// Every upstream refusal collapses into [`DownloadError::RedemptionFailed`];
    /// the caller is not told whether the token was unknown, expired or the
    /// upstream rejected it for another reason.
    pub async fn redeem_token(&self, token: &str) -> Result<FileDelivery, DownloadError> {
        if token.trim().is_empty() {
            return Err(DownloadError::Validation("token is required"));
        }

        let file = self.backend.fetch_file(token).await.map_err(|e| {
            if e.is_transport() {
                tracing::error!(error = %e, "Error downloading file");
                DownloadError::Internal
            } else {
                tracing::warn!(error = %e, "Failed to download file with provided token");
                DownloadError::RedemptionFailed
            }
        })?;

        let file_name = file.file_name.filter(|name| !name.is_empty());

        // A decoded `filename*` may carry control characters no header can hold.
        let content_disposition =
            HeaderValue::from_bytes(content_disposition(file_name.as_deref()).as_bytes())
                .map_err(|e| {
                    tracing::warn!(
                        file_name = ?file_name,
                        error = %e,
                        "Upstream filename cannot be used in Content-Disposition"
                    );
                    DownloadError::RedemptionFailed
                })?;

        tracing::info!(
            file_name = file_name.as_deref().unwrap_or("-"),
            size = file.bytes.len(),
            "File downloaded successfully"
        );

        Ok(FileDelivery {
            bytes: file.bytes,
            content_type: file
                .content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            file_name,
            content_disposition,
        })
    }
}

/// Token lifetime actually requested upstream.
///
/// Capped at 60 minutes; anything below one minute falls back to the
/// 15 minute default rather than to 1.
pub fn effective_expiration_minutes(requested: i32) -> i32 {
    let effective = requested.min(MAX_EXPIRATION_MINUTES);
    if effective < 1 {
        DEFAULT_EXPIRATION_MINUTES
    } else {
        effective
    }
}

/// ASCII stand-in for German umlauts and sharp s. Other characters pass through.
pub fn ascii_fallback(file_name: &str) -> String {
    let mut out = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'Ä' => out.push_str("Ae"),
            'Ö' => out.push_str("Oe"),
            'Ü' => out.push_str("Ue"),
            'ß' => out.push_str("ss"),
            other => out.push(other),
        }
    }
    out
}

/// RFC 6266 `Content-Disposition` value carrying both `filename` and `filename*`.
pub fn content_disposition(file_name: Option<&str>) -> String {
    match file_name.filter(|name| !name.is_empty()) {
        Some(name) => format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            ascii_fallback(name),
            urlencoding::encode(name)
        ),
        None => "attachment".to_string(),
    }
}
