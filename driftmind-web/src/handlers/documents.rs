use super::upstream_error;
use crate::models::DocumentListResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub max_results: Option<u32>,
    pub skip: Option<u32>,
    pub document_id: Option<String>,
}

pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let filter = params.document_id.filter(|id| !id.trim().is_empty());

    let response = state
        .api_client
        .get_documents(
            params.max_results.unwrap_or(50),
            params.skip.unwrap_or(0),
            filter,
        )
        .await
        .map_err(upstream_error)?;

    Ok(Json(response))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .api_client
        .delete_document(&document_id)
        .await
        .map_err(upstream_error)?;

    tracing::info!(document_id = %document_id, "Document deleted");

    Ok(Json(json!({
        "success": true,
        "documentId": document_id,
    })))
}
