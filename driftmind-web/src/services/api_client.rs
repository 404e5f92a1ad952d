//! HTTP client for the upstream DriftMind API.
//!
//! One upstream request per call, no retries, transport-default timeouts.
//! Failures come back as [`ClientError`] so callers can tell a network
//! failure apart from an upstream rejection.

use crate::config::DriftMindApiSettings;
use crate::models::{
    DocumentListRequest, DocumentListResponse, DownloadFileRequest, DownloadTokenRequest,
    DownloadTokenResponse, DownloadedFile, FileUploadResponse, SearchRequest, SearchResponse,
    UploadOptions,
};
use crate::services::metrics::record_upstream;
use reqwest::{header, multipart, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use service_core::observability::TracedClientExt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to DriftMind API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("DriftMind API returned status {0}")]
    Status(StatusCode),

    #[error("DriftMind API returned a malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("DriftMind API rejected the request: {0}")]
    Rejected(String),
}

impl ClientError {
    /// Network-level failure, as opposed to an answer from the upstream API.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    fn outcome(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "transport_error",
            ClientError::Status(_) => "status_error",
            ClientError::Decode(_) => "decode_error",
            ClientError::Rejected(_) => "rejected",
        }
    }
}

pub struct DriftMindClient {
    client: Client,
    settings: DriftMindApiSettings,
}

impl DriftMindClient {
    pub fn new(settings: DriftMindApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    /// Upload a file as multipart form data.
    pub async fn upload_file(
        &self,
        file_name: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<FileUploadResponse, ClientError> {
        let url = self.url(&self.settings.endpoints.upload);

        let result: Result<FileUploadResponse, ClientError> = async {
            let file_part = multipart::Part::bytes(data)
                .file_name(file_name.to_string())
                .mime_str("application/octet-stream")?;

            let mut form = multipart::Form::new().part("file", file_part);
            if let Some(document_id) = options.document_id.as_deref().filter(|s| !s.is_empty()) {
                form = form.text("documentId", document_id.to_string());
            }
            if let Some(metadata) = options.metadata.as_deref().filter(|s| !s.is_empty()) {
                form = form.text("metadata", metadata.to_string());
            }
            form = form
                .text("chunkSize", options.chunk_size.to_string())
                .text("chunkOverlap", options.chunk_overlap.to_string());

            let response = self.client.traced_post(&url).multipart(form).send().await?;
            read_json(ensure_success(response)?).await
        }
        .await;

        observe("upload", &url, result)
    }

    /// Upload free text as a generated `QuickNotes-xxxxxxxx.txt` file.
    pub async fn upload_text_as_file(
        &self,
        text: &str,
        options: &UploadOptions,
    ) -> Result<FileUploadResponse, ClientError> {
        let unique_id = Uuid::new_v4().simple().to_string();
        let file_name = format!("QuickNotes-{}.txt", &unique_id[..8]);

        self.upload_file(&file_name, text.as_bytes().to_vec(), options)
            .await
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        self.post_json("search", &self.settings.endpoints.search, request)
            .await
    }

    pub async fn get_documents(
        &self,
        max_results: u32,
        skip: u32,
        document_id_filter: Option<String>,
    ) -> Result<DocumentListResponse, ClientError> {
        let request = DocumentListRequest {
            max_results,
            skip,
            document_id_filter,
        };

        self.post_json("list_documents", &self.settings.endpoints.documents, &request)
            .await
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<(), ClientError> {
        let url = format!(
            "{}/{}",
            self.url(&self.settings.endpoints.documents),
            urlencoding::encode(document_id)
        );

        let result: Result<(), ClientError> = async {
            let response = self.client.traced_delete(&url).send().await?;
            ensure_success(response)?;
            Ok(())
        }
        .await;

        observe("delete_document", &url, result)
    }

    /// Ask the upstream API to issue a download token.
    ///
    /// A well-formed answer with `success: false` is reported as
    /// [`ClientError::Rejected`].
    pub async fn request_download_token(
        &self,
        document_id: &str,
        expiration_minutes: i32,
    ) -> Result<DownloadTokenResponse, ClientError> {
        let request = DownloadTokenRequest {
            document_id: document_id.to_string(),
            expiration_minutes,
        };

        let response: DownloadTokenResponse = self
            .post_json(
                "download_token",
                &self.settings.endpoints.download_token,
                &request,
            )
            .await?;

        if !response.success {
            tracing::warn!(document_id = %document_id, "DriftMind API declined to issue download token");
            return Err(ClientError::Rejected(
                "download token was not issued".to_string(),
            ));
        }

        Ok(response)
    }

    /// Redeem a download token for the file it grants.
    pub async fn fetch_file(&self, token: &str) -> Result<DownloadedFile, ClientError> {
        let url = self.url(&self.settings.endpoints.download_file);
        let request = DownloadFileRequest {
            token: token.to_string(),
        };

        let result: Result<DownloadedFile, ClientError> = async {
            let response = self.client.traced_post(&url).json(&request).send().await?;
            let response = ensure_success(response)?;

            let content_type = header_str(&response, header::CONTENT_TYPE);
            let file_name = header_str(&response, header::CONTENT_DISPOSITION)
                .as_deref()
                .and_then(filename_from_content_disposition);
            let bytes = response.bytes().await?;

            Ok(DownloadedFile {
                bytes,
                file_name,
                content_type,
            })
        }
        .await;

        observe("download_file", &url, result)
    }

    async fn post_json<B, T>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);

        let result: Result<T, ClientError> = async {
            let response = self.client.traced_post(&url).json(body).send().await?;
            read_json(ensure_success(response)?).await
        }
        .await;

        observe(operation, &url, result)
    }
}

fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(status))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn header_str(response: &Response, name: header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Log and count the outcome of one upstream call.
fn observe<T>(
    operation: &'static str,
    url: &str,
    result: Result<T, ClientError>,
) -> Result<T, ClientError> {
    match &result {
        Ok(_) => record_upstream(operation, "ok"),
        Err(e) => {
            record_upstream(operation, e.outcome());
            if e.is_transport() {
                tracing::error!(operation, url = %url, error = %e, "DriftMind API call failed");
            } else {
                tracing::warn!(operation, url = %url, error = %e, "DriftMind API call unsuccessful");
            }
        }
    }
    result
}

/// Extract the filename from a `Content-Disposition` value.
///
/// `filename*` (RFC 5987, percent-encoded) wins over a plain `filename`.
pub fn filename_from_content_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(value) {
        let Some((name, raw)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let raw = raw.trim();

        if name.eq_ignore_ascii_case("filename*") {
            let encoded = raw.split_once("''").map(|(_, rest)| rest).unwrap_or(raw);
            if let Ok(decoded) = urlencoding::decode(encoded.trim_matches('"')) {
                extended = Some(decoded.into_owned());
            }
        } else if name.eq_ignore_ascii_case("filename") {
            plain = Some(unquote(raw));
        }
    }

    extended.or(plain).filter(|name| !name.is_empty())
}

/// Split header parameters on `;`, ignoring separators inside quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(value[start..].trim());
    params
}

/// Strip surrounding quotes and resolve `\"`-style escapes of a quoted string.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"') else {
        return raw.to_string();
    };
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
