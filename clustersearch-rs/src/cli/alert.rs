//! Alert command implementation.

use crate::alert::Alert;
use crate::cli::args::AlertArgs;
use crate::cli::output::Output;
use crate::error::Result;

pub fn run(args: &AlertArgs, output: &Output) -> Result<()> {
    output.print(&Alert::from_service_error(&args.message))
}
