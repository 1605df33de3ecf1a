use super::indexer::Indexer;
use super::types::{IndexRequest, IndexResponse, TotalSizeResponse};
use crate::catalog::CatalogStore;
use crate::error::IndexError;

use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

pub async fn handle_trigger_index(
    Extension(indexer): Extension<Arc<Indexer>>,
    Json(req): Json<IndexRequest>,
) -> (StatusCode, Json<IndexResponse>) {
    let result = match req.path.as_deref() {
        Some(path) if !path.trim().is_empty() => match indexer.resolve_requested(path) {
            Ok(root) => indexer.index(root).await,
            Err(e) => Err(e),
        },
        _ => indexer.index_configured().await,
    };

    match result {
        Ok(summary) => (
            StatusCode::OK,
            Json(IndexResponse {
                status: "indexed".to_string(),
                summary: Some(summary),
            }),
        ),
        Err(e @ IndexError::OutsideRoot(_)) => {
            tracing::warn!("Refused index request: {}", e);
            (
                StatusCode::FORBIDDEN,
                Json(IndexResponse {
                    status: e.to_string(),
                    summary: None,
                }),
            )
        }
        Err(e @ (IndexError::DirectoryUnset | IndexError::NotADirectory(_))) => {
            tracing::warn!("Rejected index request: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(IndexResponse {
                    status: e.to_string(),
                    summary: None,
                }),
            )
        }
        Err(e) => {
            tracing::error!("Index run failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(IndexResponse {
                    status: e.to_string(),
                    summary: None,
                }),
            )
        }
    }
}

pub async fn handle_total_file_size(
    Extension(catalog): Extension<Arc<dyn CatalogStore>>,
) -> Json<TotalSizeResponse> {
    Json(TotalSizeResponse {
        total_file_size: catalog.total_size(),
    })
}
