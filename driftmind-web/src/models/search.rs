use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[validate(custom(function = "validate_query"))]
    pub query: String,
    #[serde(default = "default_max_results")]
    #[validate(range(min = 1, max = 100))]
    pub max_results: u32,
    #[serde(default = "default_true")]
    pub use_semantic_search: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default = "default_true")]
    pub include_answer: bool,
}

fn validate_query(query: &str) -> Result<(), ValidationError> {
    if query.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("query must not be empty".into());
        return Err(err);
    }
    Ok(())
}

fn default_max_results() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: default_max_results(),
            use_semantic_search: true,
            document_id: None,
            include_answer: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub generated_answer: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total_results: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub chunk_index: i32,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}
