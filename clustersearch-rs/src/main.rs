//! clustersearch CLI entry point.

use clap::Parser;
use clustersearch::cli::args::{Cli, Commands};
use clustersearch::cli::output::Output;
use clustersearch::cli::{alert, reconcile, search, suggest, url};
use clustersearch::config::Config;
use clustersearch::error::{ExitCode as SearchExitCode, SearchError};
use std::process::ExitCode;

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "clustersearch=warn",
        1 => "clustersearch=debug",
        _ => "clustersearch=trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code.code() as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<SearchExitCode, SearchError> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::Compile(args) => search::compile_text(args, &output)?,
        Commands::Serialize(args) => search::serialize_query(args, &output)?,
        Commands::Detect(args) => search::detect_mode(args, &output)?,
        Commands::Complete(args) => search::complete(args, &output)?,
        Commands::Suggest(args) => suggest::run(args, &config.suggestions, &output)?,
        Commands::EncodeUrl(args) => url::encode_url(args, &output)?,
        Commands::DecodeUrl(args) => url::decode_url(args, &output)?,
        Commands::Reconcile(args) => reconcile::run(args, &config, &output)?,
        Commands::Alert(args) => alert::run(args, &output)?,
    }

    Ok(SearchExitCode::Success)
}
