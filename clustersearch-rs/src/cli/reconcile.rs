//! Reconcile command implementation.

use crate::cache::{CacheSnapshot, DeleteOrigin, MatchRule, ReconcileReport, Reconciler, Resource};
use crate::cli::args::ReconcileArgs;
use crate::cli::output::{DryRunResponse, Output};
use crate::config::Config;
use crate::error::{Result, SearchError};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub cache: String,
    pub origin: DeleteOrigin,
    pub report: ReconcileReport,
}

pub fn run(args: &ReconcileArgs, config: &Config, output: &Output) -> Result<()> {
    let path: PathBuf = args
        .cache
        .clone()
        .or_else(|| config.cache.path.clone())
        .ok_or_else(|| {
            SearchError::InvalidInput(
                "No cache snapshot given; pass --cache or set [cache] path".to_string(),
            )
        })?;

    let deleted: Resource = serde_json::from_str(&args.resource)
        .map_err(|e| SearchError::InvalidInput(format!("Invalid resource: {}", e)))?;

    let rule = args
        .match_rule
        .map(MatchRule::from)
        .unwrap_or(config.reconcile.match_rule);
    let reconciler = Reconciler::new(rule);

    if args.dry_run {
        let (mut items, mut related) = CacheSnapshot::load_or_empty(&path)?.into_stores();
        let report =
            reconciler.reconcile(args.origin(), &args.query, &deleted, &mut items, &mut related);
        return output.print(&DryRunResponse {
            action: "reconcile".to_string(),
            path: path.display().to_string(),
            changes: report,
        });
    }

    let report = CacheSnapshot::update(&path, |items, related| {
        reconciler.reconcile(args.origin(), &args.query, &deleted, items, related)
    })?;
    output.info(&format!("Reconciled {}", path.display()));

    output.print(&ReconcileResponse {
        cache: path.display().to_string(),
        origin: args.origin(),
        report,
    })
}
