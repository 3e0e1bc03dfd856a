//! Search bar query language: compilation, autocomplete and URL state.

pub mod autocomplete;
pub mod parser;
pub mod suggest;
pub mod types;
pub mod url;

pub use autocomplete::{completion_request, detect};
pub use parser::{compile, serialize};
pub use suggest::{format_suggestions, SuggestionOptions};
pub use types::*;
pub use url::{SearchUrlState, SearchView};
