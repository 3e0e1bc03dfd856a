//! Query commands: compile, serialize, detect and complete.

use crate::cli::args::{SerializeArgs, TextArgs};
use crate::cli::output::Output;
use crate::error::{Result, SearchError};
use crate::search::{
    compile, completion_request, detect, serialize, Completion, CompletionRequest, StructuredQuery,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CompileResponse {
    pub text: String,
    pub query: StructuredQuery,
}

#[derive(Debug, Serialize)]
pub struct SerializeResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    #[serde(flatten)]
    pub completion: Completion,
    pub request: CompletionRequest,
}

pub fn compile_text(args: &TextArgs, output: &Output) -> Result<()> {
    let response = CompileResponse {
        text: args.text.clone(),
        query: compile(&args.text),
    };
    output.print(&response)
}

pub fn serialize_query(args: &SerializeArgs, output: &Output) -> Result<()> {
    let query: StructuredQuery = serde_json::from_str(&args.query)
        .map_err(|e| SearchError::InvalidInput(format!("Invalid structured query: {}", e)))?;
    output.print(&SerializeResponse {
        text: serialize(&query),
    })
}

pub fn detect_mode(args: &TextArgs, output: &Output) -> Result<()> {
    output.print(&detect(&args.text))
}

pub fn complete(args: &TextArgs, output: &Output) -> Result<()> {
    let response = CompleteResponse {
        completion: detect(&args.text),
        request: completion_request(&args.text),
    };
    output.print(&response)
}
