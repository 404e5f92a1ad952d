use super::upstream_error;
use crate::models::{FileUploadResponse, UploadOptions};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTextRequest {
    pub text: String,
    pub document_id: Option<String>,
    pub metadata: Option<String>,
    pub chunk_size: Option<u32>,
    pub chunk_overlap: Option<u32>,
}

struct PendingFile {
    name: String,
    data: Vec<u8>,
}

fn parse_number(field: &str, raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("{} must be a positive number", field)))
}

/// Forward every `file` part to the DriftMind API.
///
/// Options (`documentId`, `metadata`, `chunkSize`, `chunkOverlap`) may appear
/// anywhere in the form and apply to all files. Each file is uploaded
/// independently so one failure does not abort the rest.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut options = UploadOptions::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let read_error = |e: axum::extract::multipart::MultipartError| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read field {}: {}", name, e))
        };

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let data = field.bytes().await.map_err(read_error)?;
                files.push(PendingFile {
                    name: file_name,
                    data: data.to_vec(),
                });
            }
            "documentId" => options.document_id = Some(field.text().await.map_err(read_error)?),
            "metadata" => options.metadata = Some(field.text().await.map_err(read_error)?),
            "chunkSize" => {
                options.chunk_size = parse_number("chunkSize", &field.text().await.map_err(read_error)?)?
            }
            "chunkOverlap" => {
                options.chunk_overlap =
                    parse_number("chunkOverlap", &field.text().await.map_err(read_error)?)?
            }
            other => tracing::debug!(field = %other, "Ignoring unknown upload field"),
        }
    }

    if files.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("No file provided")));
    }

    let mut uploaded: Vec<FileUploadResponse> = Vec::new();
    let mut errors = Vec::new();

    for file in files {
        match state
            .api_client
            .upload_file(&file.name, file.data, &options)
            .await
        {
            Ok(response) if response.success => {
                tracing::info!(
                    file_name = %file.name,
                    document_id = %response.document_id,
                    chunks = response.chunks_created,
                    "File uploaded successfully"
                );
                uploaded.push(response);
            }
            Ok(response) => {
                tracing::warn!(file_name = %file.name, message = %response.message, "Upload rejected");
                errors.push(format!("{}: {}", file.name, response.message));
            }
            Err(e) => errors.push(format!("{}: {}", file.name, e)),
        }
    }

    let status = match (uploaded.is_empty(), errors.is_empty()) {
        (_, true) => "success",
        (false, false) => "partial",
        (true, false) => "error",
    };

    Ok(Json(json!({
        "status": status,
        "uploaded": uploaded.len(),
        "results": uploaded,
        "errors": errors,
    })))
}

/// Store free text as a generated quick-notes file.
pub async fn upload_text(
    State(state): State<AppState>,
    Json(request): Json<UploadTextRequest>,
) -> Result<Json<FileUploadResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("text is required")));
    }

    let defaults = UploadOptions::default();
    let options = UploadOptions {
        document_id: request.document_id,
        metadata: request.metadata,
        chunk_size: request.chunk_size.unwrap_or(defaults.chunk_size),
        chunk_overlap: request.chunk_overlap.unwrap_or(defaults.chunk_overlap),
    };

    let response = state
        .api_client
        .upload_text_as_file(&request.text, &options)
        .await
        .map_err(upstream_error)?;

    Ok(Json(response))
}
