use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token issuance call sent upstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTokenRequest {
    pub document_id: String,
    pub expiration_minutes: i32,
}

/// Token issued by the upstream API. Opaque to this service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTokenResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub document_id: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub success: bool,
}

/// Redemption call sent upstream.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadFileRequest {
    pub token: String,
}

/// A redeemed file, held in memory for one response.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_accepts_naive_expiry() {
        let response: DownloadTokenResponse = serde_json::from_str(
            r#"{"token":"abc","documentId":"doc-1","expiresAt":"2025-01-01T10:15:00","success":true}"#,
        )
        .unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.expires_at.to_rfc3339(), "2025-01-01T10:15:00+00:00");
    }

    #[test]
    fn token_request_uses_camel_case() {
        let value = serde_json::to_value(DownloadTokenRequest {
            document_id: "doc-1".to_string(),
            expiration_minutes: 15,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"documentId": "doc-1", "expirationMinutes": 15}));
    }
}
