//! Formatting of schema properties and values into search bar suggestions.

use crate::search::autocomplete::detect;
use crate::search::parser::compile;
use crate::search::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Options controlling suggestion formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionOptions {
    /// Drop values that are already selected in the typed query, and repeated
    /// values in the service response. Applies to value suggestions only.
    pub dedupe_selected_values: bool,
}

/// Build the suggestion list shown under the search bar.
///
/// The list always starts with a disabled header. `already_typed` is the raw
/// search text and is only consulted when de-duplication is enabled.
pub fn format_suggestions(
    values: &[String],
    kind: SuggestionKind,
    already_typed: &str,
    options: &SuggestionOptions,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::with_capacity(values.len() + 1);
    suggestions.push(Suggestion {
        id: "id-suggestions-label".to_string(),
        key: "key-suggestions-label".to_string(),
        name: kind.header().to_string(),
        kind,
        disabled: true,
    });

    let dedupe = options.dedupe_selected_values && kind == SuggestionKind::Value;
    let mut seen: HashSet<&str> = HashSet::new();
    let selected = if dedupe {
        selected_values(already_typed)
    } else {
        HashSet::new()
    };

    for value in values {
        if dedupe && (selected.contains(value.as_str()) || !seen.insert(value.as_str())) {
            continue;
        }
        suggestions.push(Suggestion {
            id: format!("id-{}", value),
            key: format!("key-{}", value),
            name: value.clone(),
            kind,
            disabled: false,
        });
    }

    suggestions
}

/// Non-empty values already selected for the property being completed, or
/// for every property when no target can be determined.
fn selected_values(already_typed: &str) -> HashSet<String> {
    let query = compile(already_typed);
    let selected: Vec<&str> = match detect(already_typed).target_property {
        Some(property) => query.values_for(&property).collect(),
        None => query
            .filters
            .iter()
            .flat_map(|f| f.values.iter().map(String::as_str))
            .collect(),
    };
    selected
        .into_iter()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
