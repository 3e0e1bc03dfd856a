//! Compiler between search-bar text and [`StructuredQuery`].
//!
//! Grammar:
//! ```text
//! query   = token (" " token)*
//! token   = filter | keyword
//! filter  = PROPERTY ":" value ("," value)*
//! keyword = any text without ":"
//! ```
//!
//! The language is flat: there are no operators, groups or quoting. Empty
//! tokens produced by repeated spaces are ignored.

use crate::search::types::*;

// ============================================================================
// Tokens
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    /// A free-text term.
    Keyword(&'a str),
    /// A `property:values` term, split at the first colon.
    Filter { property: &'a str, values: &'a str },
}

fn tokenize(input: &str) -> impl Iterator<Item = Token<'_>> {
    input
        .split(' ')
        .filter(|raw| !raw.is_empty())
        .map(|raw| match raw.split_once(':') {
            Some((property, values)) => Token::Filter { property, values },
            None => Token::Keyword(raw),
        })
}

/// True when `value` is exactly one of the relational operator tokens.
pub fn is_operator(value: &str) -> bool {
    OPERATORS.contains(&value)
}

// ============================================================================
// Compiler
// ============================================================================

/// Compile search-bar text into a structured query.
///
/// Never fails. A filter whose first value is a bare operator (`name:=`) is
/// still being typed and is left out of the result.
pub fn compile(text: &str) -> StructuredQuery {
    let mut query = StructuredQuery::default();

    for token in tokenize(text) {
        match token {
            Token::Keyword(word) => query.keywords.push(word.to_string()),
            Token::Filter { property, values } => {
                let values: Vec<String> = values.split(',').map(str::to_string).collect();
                if values.first().is_some_and(|v| is_operator(v)) {
                    continue;
                }
                query.filters.push(SearchFilter::new(property, values));
            }
        }
    }

    query
}

/// Render a structured query back into search-bar text.
///
/// Keywords come first, then filters, each separated by a single space.
pub fn serialize(query: &StructuredQuery) -> String {
    let keywords = query.keywords.iter().cloned();
    let filters = query
        .filters
        .iter()
        .map(|f| format!("{}:{}", f.property, f.values.join(",")));

    keywords.chain(filters).collect::<Vec<_>>().join(" ")
}
