//! Cached search result data structures.

use crate::search::StructuredQuery;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cluster resource as returned by the search service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique id assigned by the search indexer.
    #[serde(rename = "_uid", alias = "uid", default)]
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub cluster: String,
    pub kind: String,
    #[serde(rename = "selfLink", default)]
    pub self_link: String,
    /// Every other indexed property, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Resource {
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, cluster: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self.namespace = namespace.into();
        self
    }

    pub fn with_self_link(mut self, self_link: impl Into<String>) -> Self {
        self.self_link = self_link.into();
        self
    }
}

/// Related resources of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedItems {
    pub kind: String,
    pub items: Vec<Resource>,
}

/// Number of related resources of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedCount {
    pub kind: String,
    pub count: u64,
}

/// A previously fetched search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CachedResultEntry {
    /// Direct search results.
    Items { items: Vec<Resource> },
    /// Resources related to the matched set, grouped by kind.
    RelatedItems { related: Vec<RelatedItems> },
    /// Related resource counts, grouped by kind.
    RelatedCount { related: Vec<RelatedCount> },
}

/// The search service query a cache entry answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDocument {
    SearchResultItems,
    SearchResultRelatedItems,
    SearchResultRelatedCount,
}

/// One element of the `input` variable sent to the search service.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SearchInput {
    #[serde(flatten)]
    pub query: StructuredQuery,
    #[serde(rename = "relatedKinds", default, skip_serializing_if = "Option::is_none")]
    pub related_kinds: Option<Vec<String>>,
}

impl From<StructuredQuery> for SearchInput {
    fn from(query: StructuredQuery) -> Self {
        Self {
            query,
            related_kinds: None,
        }
    }
}

/// Cache key: the query document plus its full variables, filters included.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub document: QueryDocument,
    pub input: Vec<SearchInput>,
}

impl CacheKey {
    /// Key of the direct results for `query`.
    pub fn items(query: &StructuredQuery) -> Self {
        Self {
            document: QueryDocument::SearchResultItems,
            input: vec![query.clone().into()],
        }
    }

    /// Key of the related items of `kind` for `query`.
    pub fn related_items(query: &StructuredQuery, kind: &str) -> Self {
        Self {
            document: QueryDocument::SearchResultRelatedItems,
            input: vec![SearchInput {
                query: query.clone(),
                related_kinds: Some(vec![kind.to_string()]),
            }],
        }
    }

    /// Key of the related counts for `query`.
    pub fn related_count(query: &StructuredQuery) -> Self {
        Self {
            document: QueryDocument::SearchResultRelatedCount,
            input: vec![query.clone().into()],
        }
    }
}

/// A key and its entry, as stored in a snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub key: CacheKey,
    pub entry: CachedResultEntry,
}
