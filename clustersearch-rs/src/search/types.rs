//! Structured query and suggestion types for cluster search.

use serde::{Deserialize, Serialize};

/// Relational operators a user may type directly after `property:`.
///
/// A filter whose first value is one of these has not been given a value yet.
pub const OPERATORS: &[&str] = &["=", "<", ">", "<=", ">=", "!=", "!"];

/// A compiled search: free-text keywords plus property filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StructuredQuery {
    /// Free-text terms, matched as substrings by the search service.
    pub keywords: Vec<String>,
    /// Property filters. The same property may appear more than once.
    pub filters: Vec<SearchFilter>,
}

impl StructuredQuery {
    /// True when the query carries neither keywords nor filters.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.filters.is_empty()
    }

    /// Remove every filter on `property`.
    pub fn without_property(mut self, property: &str) -> Self {
        self.filters.retain(|f| f.property != property);
        self
    }

    /// All values selected for `property`, across duplicate filters.
    pub fn values_for<'a, 'p>(&'a self, property: &'p str) -> impl Iterator<Item = &'a str> {
        self.filters
            .iter()
            .filter(move |f| f.property == property)
            .flat_map(|f| f.values.iter().map(String::as_str))
    }
}

/// A single `property:value[,value...]` clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SearchFilter {
    pub property: String,
    pub values: Vec<String>,
}

impl SearchFilter {
    pub fn new(property: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            property: property.into(),
            values,
        }
    }
}

/// What the search bar should offer next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutocompleteMode {
    /// Suggest filter property names.
    Property,
    /// Suggest values for a specific property.
    Value,
}

/// Result of inspecting a partially typed search string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub mode: AutocompleteMode,
    /// Only present in [`AutocompleteMode::Value`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_property: Option<String>,
}

/// The request the search bar sends to the search service for suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletionRequest {
    /// Ask the schema for every searchable property.
    Schema,
    /// Ask for the values of `property` among resources matching `query`.
    Values {
        property: String,
        query: StructuredQuery,
    },
}

/// Kind of entries in a suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Filter,
    Value,
}

impl SuggestionKind {
    /// Label for the disabled header item.
    pub fn header(self) -> &'static str {
        match self {
            SuggestionKind::Filter => "Filters",
            SuggestionKind::Value => "Filter values",
        }
    }
}

impl From<AutocompleteMode> for SuggestionKind {
    fn from(mode: AutocompleteMode) -> Self {
        match mode {
            AutocompleteMode::Property => SuggestionKind::Filter,
            AutocompleteMode::Value => SuggestionKind::Value,
        }
    }
}

/// One entry of the search bar's suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub key: String,
    pub name: String,
    pub kind: SuggestionKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}
