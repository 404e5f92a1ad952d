use super::upstream_error;
use crate::models::{SearchRequest, SearchResponse};
use crate::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    request.validate()?;

    let response = state
        .api_client
        .search(&request)
        .await
        .map_err(upstream_error)?;

    tracing::info!(
        results = response.results.len(),
        semantic = request.use_semantic_search,
        "Search completed"
    );

    Ok(Json(response))
}
