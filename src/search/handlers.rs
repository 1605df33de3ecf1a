use super::engine::SearchCoordinator;
use super::types::{GlobalSearchForm, LocalSearchRequest, SearchResult};
use crate::catalog::SearchQuery;
use axum::extract::{Form, Path};
use axum::{Extension, Json};
use std::sync::Arc;

pub async fn handle_local_search(
    Extension(search): Extension<Arc<SearchCoordinator>>,
    Json(req): Json<LocalSearchRequest>,
) -> Json<Vec<SearchResult>> {
    let query = SearchQuery::from(req);
    Json(search.local_search(&query))
}

pub async fn handle_global_search(
    Extension(search): Extension<Arc<SearchCoordinator>>,
    Form(form): Form<GlobalSearchForm>,
) -> Json<Vec<SearchResult>> {
    Json(search.search(&SearchQuery::from(form)).await)
}

pub async fn handle_json_global_search(
    Extension(search): Extension<Arc<SearchCoordinator>>,
    Json(form): Json<GlobalSearchForm>,
) -> Json<Vec<SearchResult>> {
    Json(search.search(&SearchQuery::from(form)).await)
}

pub async fn handle_hash_search(
    Extension(search): Extension<Arc<SearchCoordinator>>,
    Path(fingerprint): Path<String>,
) -> Json<Vec<SearchResult>> {
    Json(search.search(&SearchQuery::hash(fingerprint)).await)
}
