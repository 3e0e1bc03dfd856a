//! Shareable URL state for the search page.
//!
//! The raw search text travels verbatim inside a small JSON object, and the
//! related kinds to expand travel as a comma-separated list:
//!
//! ```text
//! ?filters={"textsearch":"kind%3Apod%20cluster%3Aprod"}&showrelated=pod,deployment
//! ```

use crate::search::parser::compile;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

const FILTERS_PARAM: &str = "filters";
const RELATED_PARAM: &str = "showrelated";

/// Search page state that survives a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchUrlState {
    /// The search text exactly as typed.
    pub raw_query: String,
    /// Related resource kinds expanded when the page opens.
    pub pre_selected_related: Vec<String>,
}

/// Which view the search page shows for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchView {
    SavedSearches,
    Results,
}

#[derive(Debug, Serialize, Deserialize)]
struct FiltersParam {
    #[serde(default)]
    textsearch: String,
}

impl SearchUrlState {
    pub fn new(raw_query: impl Into<String>, pre_selected_related: Vec<String>) -> Self {
        Self {
            raw_query: raw_query.into(),
            pre_selected_related,
        }
    }

    /// Results are shown only when the text compiles to something searchable.
    pub fn view(&self) -> SearchView {
        if self.raw_query.is_empty() || compile(&self.raw_query).is_empty() {
            SearchView::SavedSearches
        } else {
            SearchView::Results
        }
    }

    pub fn encode(&self) -> String {
        encode(&self.raw_query, &self.pre_selected_related)
    }
}

/// Encode search state as a URL query string (including the leading `?`).
///
/// The empty state encodes to an empty string.
pub fn encode(raw_query: &str, pre_selected_related: &[String]) -> String {
    let mut params = Vec::new();

    if !raw_query.is_empty() {
        params.push(format!(
            "{}={{\"textsearch\":\"{}\"}}",
            FILTERS_PARAM,
            urlencoding::encode(raw_query)
        ));
    }

    if !pre_selected_related.is_empty() {
        let kinds: Vec<Cow<'_, str>> = pre_selected_related
            .iter()
            .map(|kind| urlencoding::encode(kind))
            .collect();
        params.push(format!("{}={}", RELATED_PARAM, kinds.join(",")));
    }

    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

/// Decode a URL, path or bare query string back into search state.
///
/// Missing or unreadable parameters fall back to the empty state.
pub fn decode(fragment: &str) -> SearchUrlState {
    let fragment = fragment.split('#').next().unwrap_or("");
    let query = match fragment.split_once('?') {
        Some((_, query)) => query,
        None => fragment,
    };

    let mut state = SearchUrlState::default();

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            FILTERS_PARAM => {
                if let Some(text) = parse_filters(value) {
                    state.raw_query = percent_decode(&text).into_owned();
                }
            }
            RELATED_PARAM => {
                state.pre_selected_related = value
                    .split(',')
                    .filter(|kind| !kind.is_empty())
                    .map(|kind| percent_decode(kind).into_owned())
                    .collect();
            }
            _ => {}
        }
    }

    state
}

/// Read `textsearch` from the filters parameter, which browsers may hand back
/// either as written or fully percent-encoded.
fn parse_filters(value: &str) -> Option<String> {
    if let Ok(param) = serde_json::from_str::<FiltersParam>(value) {
        return Some(param.textsearch);
    }
    let decoded = urlencoding::decode(value).ok()?;
    serde_json::from_str::<FiltersParam>(&decoded)
        .ok()
        .map(|param| param.textsearch)
}

fn percent_decode(text: &str) -> Cow<'_, str> {
    urlencoding::decode(text).unwrap_or(Cow::Borrowed(text))
}
