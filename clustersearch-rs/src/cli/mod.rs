//! CLI command implementations.

pub mod args;
pub mod output;

pub mod alert;
pub mod reconcile;
pub mod search;
pub mod suggest;
pub mod url;

pub use args::{Cli, Commands};
pub use output::Output;
