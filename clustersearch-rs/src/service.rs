//! Interfaces of the remote services the search page talks to.
//!
//! Transport is not modelled here. Implementations wrap whatever client the
//! embedding application uses; calls are blocking from the caller's view.

use crate::alert::Alert;
use crate::cache::{
    CacheKey, CachedResultEntry, QueryDocument, RelatedCount, RelatedItems, Resource,
    ResultCache, SearchInput,
};
use crate::search::{
    completion_request, format_suggestions, CompletionRequest, StructuredQuery, Suggestion,
    SuggestionKind, SuggestionOptions,
};
use serde::{Deserialize, Serialize};

/// The remote search service.
///
/// Schema and value lookups feed autocomplete; the result queries fill the
/// cache stores that deletes are later patched into.
pub trait SearchService {
    /// Every searchable property name.
    fn search_schema(&self) -> Result<Vec<String>, String>;

    /// Values of `property` among resources matching `query`.
    fn search_complete(&self, property: &str, query: &StructuredQuery) -> Result<Vec<String>, String>;

    /// Resources matching `input`.
    fn search_items(&self, input: &[SearchInput]) -> Result<Vec<Resource>, String>;

    /// Resources related to the matches of `input`, limited to its related kinds.
    fn search_related_items(&self, input: &[SearchInput]) -> Result<Vec<RelatedItems>, String>;

    /// Number of related resources per kind for the matches of `input`.
    fn search_related_count(&self, input: &[SearchInput]) -> Result<Vec<RelatedCount>, String>;
}

/// Variables of the delete mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "selfLink")]
    pub self_link: String,
    pub name: String,
    pub namespace: String,
    pub cluster: String,
    pub kind: String,
}

/// The delete mutation.
pub trait DeleteService {
    /// Delete a resource. The error is the service's message.
    fn delete_resource(&mut self, request: &DeleteRequest) -> Result<(), String>;
}

/// Variables of an access review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub resource: String,
    pub action: String,
    pub namespace: String,
    pub name: String,
    #[serde(rename = "apiGroup")]
    pub api_group: String,
}

/// Answers whether the current user may perform an action.
pub trait AccessReviewer {
    fn review(&self, request: &AccessRequest) -> Result<bool, String>;
}

/// Fetch and format the suggestions for partially typed search text.
///
/// Service failures come back as the alert to display above the search bar.
pub fn fetch_suggestions(
    service: &dyn SearchService,
    text: &str,
    options: &SuggestionOptions,
) -> Result<Vec<Suggestion>, Alert> {
    let (values, kind) = match completion_request(text) {
        CompletionRequest::Schema => (service.search_schema(), SuggestionKind::Filter),
        CompletionRequest::Values { property, query } => (
            service.search_complete(&property, &query),
            SuggestionKind::Value,
        ),
    };
    let values = values.map_err(|message| Alert::from_service_error(&message))?;
    Ok(format_suggestions(&values, kind, text, options))
}

/// Run the query `key` describes and cache the response under `key`.
///
/// A failed query leaves the store untouched.
pub fn fetch_results(
    service: &dyn SearchService,
    key: CacheKey,
    store: &mut dyn ResultCache,
) -> Result<CachedResultEntry, Alert> {
    let entry = match key.document {
        QueryDocument::SearchResultItems => service
            .search_items(&key.input)
            .map(|items| CachedResultEntry::Items { items }),
        QueryDocument::SearchResultRelatedItems => service
            .search_related_items(&key.input)
            .map(|related| CachedResultEntry::RelatedItems { related }),
        QueryDocument::SearchResultRelatedCount => service
            .search_related_count(&key.input)
            .map(|related| CachedResultEntry::RelatedCount { related }),
    }
    .map_err(|message| Alert::from_service_error(&message))?;

    store.write(key, entry.clone());
    Ok(entry)
}
