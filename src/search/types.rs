use crate::catalog::{CatalogEntry, SearchMode, SearchQuery};
use crate::config::Protocol;
use crate::membership::types::PeerId;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category value meaning "no category filter".
pub const CATEGORY_ALL: &str = "all";

pub const ENDPOINT_LOCAL_SEARCH: &str = "/localsearch";
pub const ENDPOINT_GLOBAL_SEARCH: &str = "/global_search";
pub const ENDPOINT_JSON_GLOBAL_SEARCH: &str = "/json/global_search";
pub const ENDPOINT_HASH_SEARCH: &str = "/json/hash_search/:fingerprint";

/// A catalog entry as seen by a searcher, tagged with the node that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub path: String,
    pub fingerprint: String,
    pub size: u64,
    pub category: String,
    #[serde(default)]
    pub popularity: u64,
    #[serde(default)]
    pub indexed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub origin_peer: PeerId,
    #[serde(default)]
    pub download_uri: String,
}

impl SearchResult {
    pub fn from_entry(entry: CatalogEntry, origin_peer: &str, protocol: Protocol) -> Self {
        let download_uri = download_uri(protocol, origin_peer, &entry.fingerprint);
        Self {
            name: entry.name,
            path: entry.path,
            fingerprint: entry.fingerprint,
            size: entry.size,
            category: entry.category,
            popularity: entry.popularity,
            indexed_at: Some(entry.indexed_at),
            origin_peer: origin_peer.to_string(),
            download_uri,
        }
    }
}

pub fn download_uri(protocol: Protocol, peer: &str, fingerprint: &str) -> String {
    format!("{}://{}/download/{}", protocol, peer, fingerprint)
}

/// Body of `POST /localsearch`, also what the coordinator sends to each peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalSearchRequest {
    pub search_term: String,
    #[serde(default)]
    pub search_type: SearchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&SearchQuery> for LocalSearchRequest {
    fn from(query: &SearchQuery) -> Self {
        Self {
            search_term: query.term.clone(),
            search_type: query.mode,
            category: query.category.clone(),
        }
    }
}

impl From<LocalSearchRequest> for SearchQuery {
    fn from(req: LocalSearchRequest) -> Self {
        SearchQuery {
            term: req.search_term,
            mode: req.search_type,
            category: normalize_category(req.category),
        }
    }
}

/// Fields of the global search form and of its JSON twin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalSearchForm {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl From<GlobalSearchForm> for SearchQuery {
    fn from(form: GlobalSearchForm) -> Self {
        SearchQuery {
            term: form.query,
            mode: SearchMode::Name,
            category: normalize_category(form.category),
        }
    }
}

/// Drops blank and `"all"` categories.
pub fn normalize_category(category: Option<String>) -> Option<String> {
    category.filter(|c| {
        let c = c.trim();
        !c.is_empty() && !c.eq_ignore_ascii_case(CATEGORY_ALL)
    })
}
