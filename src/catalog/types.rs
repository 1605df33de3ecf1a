use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indexed file, keyed by its content fingerprint.
///
/// Created by the indexer the first time a fingerprint is seen and never
/// rewritten afterwards; only `popularity` moves, and only through
/// [`CatalogStore::increment_popularity`](super::store::CatalogStore::increment_popularity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub path: String,
    pub fingerprint: String,
    pub size: u64,
    pub category: String,
    #[serde(default)]
    pub popularity: u64,
    pub indexed_at: DateTime<Utc>,
}

/// How `SearchQuery::term` is compared against an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring of the file name.
    #[default]
    Name,
    /// Exact fingerprint. `md5` is what older nodes send.
    #[serde(alias = "md5")]
    Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub term: String,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub category: Option<String>,
}

impl SearchQuery {
    pub fn name(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            mode: SearchMode::Name,
            category: None,
        }
    }

    pub fn hash(fingerprint: impl Into<String>) -> Self {
        Self {
            term: fingerprint.into(),
            mode: SearchMode::Hash,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if let Some(category) = &self.category
            && &entry.category != category
        {
            return false;
        }

        match self.mode {
            SearchMode::Name => entry
                .name
                .to_lowercase()
                .contains(&self.term.to_lowercase()),
            SearchMode::Hash => entry.fingerprint == self.term,
        }
    }
}
