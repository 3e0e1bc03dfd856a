//! Suggest command implementation.

use crate::cli::args::SuggestArgs;
use crate::cli::output::Output;
use crate::error::Result;
use crate::search::{format_suggestions, Suggestion, SuggestionOptions};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
    pub total: usize,
}

pub fn run(args: &SuggestArgs, options: &SuggestionOptions, output: &Output) -> Result<()> {
    let options = SuggestionOptions {
        dedupe_selected_values: args.dedupe || options.dedupe_selected_values,
    };
    let suggestions = format_suggestions(&args.values, args.kind.into(), &args.typed, &options);

    // The header is not a selectable suggestion.
    let total = suggestions.iter().filter(|s| !s.disabled).count();
    output.print(&SuggestResponse { suggestions, total })
}
