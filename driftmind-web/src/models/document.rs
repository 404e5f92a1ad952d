use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional parameters forwarded with every upload.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub document_id: Option<String>,
    pub metadata: Option<String>,
    pub chunk_size: u32,
    pub chunk_overlap: u32,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            document_id: None,
            metadata: None,
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FileUploadResponse {
    pub document_id: String,
    pub chunks_created: i32,
    pub success: bool,
    pub message: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size_in_bytes: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListRequest {
    pub max_results: u32,
    pub skip: u32,
    pub document_id_filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListResponse {
    #[serde(default)]
    pub documents: Vec<DocumentInfo>,
    #[serde(default)]
    pub total_documents: i32,
    #[serde(default)]
    pub returned_documents: i32,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub document_id: String,
    #[serde(default)]
    pub chunk_count: i32,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_size_in_bytes: Option<i64>,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sample_content: Vec<String>,
}
