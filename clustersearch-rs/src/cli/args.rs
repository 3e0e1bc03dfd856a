//! CLI argument definitions using clap.

use crate::cache::{DeleteOrigin, MatchRule};
use crate::search::SuggestionKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clustersearch")]
#[command(author, version, about = "Cluster search query tools", long_about = None)]
pub struct Cli {
    /// Path to the config file (overrides the default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile search text into a structured query
    Compile(TextArgs),

    /// Render a structured query (JSON) back into search text
    Serialize(SerializeArgs),

    /// Detect the autocomplete mode of partially typed search text
    Detect(TextArgs),

    /// Show the suggestion request the search bar would send
    Complete(TextArgs),

    /// Format raw properties or values as search bar suggestions
    Suggest(SuggestArgs),

    /// Encode search text and related kinds as a shareable URL query
    #[command(name = "encode-url")]
    EncodeUrl(EncodeUrlArgs),

    /// Decode a shareable URL back into search state
    #[command(name = "decode-url")]
    DecodeUrl(DecodeUrlArgs),

    /// Remove a deleted resource from a cache snapshot
    Reconcile(ReconcileArgs),

    /// Classify a search service error message
    Alert(AlertArgs),
}

#[derive(Args, Debug)]
pub struct TextArgs {
    /// Search text, exactly as typed
    #[arg(allow_hyphen_values = true)]
    pub text: String,
}

#[derive(Args, Debug)]
pub struct SerializeArgs {
    /// Structured query as JSON: {"keywords": [...], "filters": [...]}
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuggestKindArg {
    Property,
    Value,
}

impl From<SuggestKindArg> for SuggestionKind {
    fn from(kind: SuggestKindArg) -> Self {
        match kind {
            SuggestKindArg::Property => SuggestionKind::Filter,
            SuggestKindArg::Value => SuggestionKind::Value,
        }
    }
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Raw property names or values from the search service
    pub values: Vec<String>,

    /// Whether the values are property names or values
    #[arg(long, value_enum, default_value = "property")]
    pub kind: SuggestKindArg,

    /// Search text typed so far
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub typed: String,

    /// Drop values already selected in the typed text
    #[arg(long)]
    pub dedupe: bool,
}

#[derive(Args, Debug)]
pub struct EncodeUrlArgs {
    /// Search text, exactly as typed
    #[arg(allow_hyphen_values = true)]
    pub text: String,

    /// Related kind to expand when the page opens (repeatable)
    #[arg(long = "related")]
    pub related: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DecodeUrlArgs {
    /// URL, path or query string
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchRuleArg {
    UidAndName,
    Composite,
}

impl From<MatchRuleArg> for MatchRule {
    fn from(rule: MatchRuleArg) -> Self {
        match rule {
            MatchRuleArg::UidAndName => MatchRule::UidAndName,
            MatchRuleArg::Composite => MatchRule::Composite,
        }
    }
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Cache snapshot file (defaults to [cache] path from the config)
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Search text active when the resource was deleted
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub query: String,

    /// Deleted resource as JSON
    #[arg(long)]
    pub resource: String,

    /// The resource was deleted from a related resources table
    #[arg(long)]
    pub related: bool,

    /// Override the configured match rule
    #[arg(long, value_enum)]
    pub match_rule: Option<MatchRuleArg>,

    /// Show what would change without writing the snapshot
    #[arg(long)]
    pub dry_run: bool,
}

impl ReconcileArgs {
    pub fn origin(&self) -> DeleteOrigin {
        if self.related {
            DeleteOrigin::Related
        } else {
            DeleteOrigin::Results
        }
    }
}

#[derive(Args, Debug)]
pub struct AlertArgs {
    /// Error message returned by the search service
    pub message: String,
}
