//! URL state commands.

use crate::cli::args::{DecodeUrlArgs, EncodeUrlArgs};
use crate::cli::output::Output;
use crate::error::Result;
use crate::search::url::{decode, encode};
use crate::search::{SearchUrlState, SearchView};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EncodeResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DecodeResponse {
    #[serde(flatten)]
    pub state: SearchUrlState,
    pub view: SearchView,
}

pub fn encode_url(args: &EncodeUrlArgs, output: &Output) -> Result<()> {
    output.print(&EncodeResponse {
        url: encode(&args.text, &args.related),
    })
}

pub fn decode_url(args: &DecodeUrlArgs, output: &Output) -> Result<()> {
    let state = decode(&args.url);
    let view = state.view();
    output.print(&DecodeResponse { state, view })
}
