//! Autocomplete mode detection for the search bar.

use crate::search::parser::compile;
use crate::search::types::*;

/// Decide whether the user is completing a property name or a value.
///
/// The text is in value mode when it ends with `:` or any operator token.
/// Only the trailing colon is stripped from the target property; an operator
/// suffix stays part of it.
pub fn detect(text: &str) -> Completion {
    if !ends_with_value_prefix(text) {
        return Completion {
            mode: AutocompleteMode::Property,
            target_property: None,
        };
    }

    let last = text.rsplit(' ').next().unwrap_or("");
    let target = last.strip_suffix(':').unwrap_or(last);

    Completion {
        mode: AutocompleteMode::Value,
        target_property: Some(target.to_string()),
    }
}

/// Build the suggestion request for a partially typed search string.
///
/// In value mode any filter on the target property is removed from the
/// query, so the property being edited does not narrow its own candidates.
pub fn completion_request(text: &str) -> CompletionRequest {
    let completion = detect(text);
    match completion.target_property {
        Some(property) => {
            let query = compile(text).without_property(&property);
            CompletionRequest::Values { property, query }
        }
        None => CompletionRequest::Schema,
    }
}

fn ends_with_value_prefix(text: &str) -> bool {
    text.ends_with(':') || OPERATORS.iter().any(|op| text.ends_with(op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_colon_is_value_mode() {
        let completion = detect("cluster:");
        assert_eq!(completion.mode, AutocompleteMode::Value);
        assert_eq!(completion.target_property.as_deref(), Some("cluster"));
    }

    #[test]
    fn test_detect_property_mode() {
        assert_eq!(detect("cluster").mode, AutocompleteMode::Property);
        assert_eq!(detect("cluster:a").mode, AutocompleteMode::Property);
        assert_eq!(detect("").mode, AutocompleteMode::Property);
        assert_eq!(detect("cluster").target_property, None);
    }

    #[test]
    fn test_detect_uses_last_token() {
        let completion = detect("kind:pod status:");
        assert_eq!(completion.target_property.as_deref(), Some("status"));
    }

    #[test]
    fn test_detect_operator_suffix_not_stripped() {
        let completion = detect("cpu:>=");
        assert_eq!(completion.mode, AutocompleteMode::Value);
        assert_eq!(completion.target_property.as_deref(), Some("cpu:>="));

        let completion = detect("name:!");
        assert_eq!(completion.target_property.as_deref(), Some("name:!"));
    }

    #[test]
    fn test_detect_strips_single_colon() {
        let completion = detect("name::");
        assert_eq!(completion.target_property.as_deref(), Some("name:"));
    }

    #[test]
    fn test_completion_request_schema() {
        assert_eq!(completion_request("pod kind:pod"), CompletionRequest::Schema);
    }

    #[test]
    fn test_completion_request_removes_target_filter() {
        let request = completion_request("nginx kind:pod namespace:default kind:");
        assert_eq!(
            request,
            CompletionRequest::Values {
                property: "kind".to_string(),
                query: StructuredQuery {
                    keywords: vec!["nginx".to_string()],
                    filters: vec![SearchFilter::new(
                        "namespace",
                        vec!["default".to_string()]
                    )],
                },
            }
        );
    }
}
