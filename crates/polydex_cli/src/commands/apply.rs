//! Apply command implementation.
//!
//! Builds an index, feeds it a change batch in the same format data-source
//! adapters use, then runs a query so the effect of the batch (including
//! any stale hits before a rebuild) can be observed.

use super::search::{self, SearchOutput, SearchRequest};
use super::{build_from_file, read_json, CliError, OutputFormat};
use polydex_core::{Change, IndexConfig, MatchMode, UpdateReport};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Apply command output.
#[derive(Debug, Serialize)]
pub struct ApplyOutput<'a> {
    /// Outcome of the change batch.
    pub update: &'a UpdateReport,
    /// Search run after the batch.
    pub search: &'a SearchOutput,
}

/// Runs the apply command.
pub fn run(
    records: &Path,
    fields: &[String],
    changes: &Path,
    config: IndexConfig,
    query: &str,
    mode: MatchMode,
    format: OutputFormat,
) -> Result<(), CliError> {
    let mut index = build_from_file(records, fields, config)?;
    let changes: Vec<Change<Value>> = read_json(changes)?;
    let report = index.update_index(changes)?;
    log_report(&report);

    let request = SearchRequest {
        query: query.to_string(),
        mode,
        case_sensitive: false,
        min_score: None,
        limit: None,
    };
    let output = search::execute(&index, &request)?;

    match format {
        OutputFormat::Json => {
            let combined = ApplyOutput {
                update: &report,
                search: &output,
            };
            match serde_json::to_string_pretty(&combined) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Failed to serialize output: {e}"),
            }
        }
        OutputFormat::Text => {
            println!(
                "Applied {} change(s), skipped {}, rebuilt: {}, pending: {}",
                report.applied, report.skipped, report.rebuilt, report.pending_changes
            );
            search::print_output(&output, OutputFormat::Text);
        }
    }

    Ok(())
}

fn log_report(report: &UpdateReport) {
    info!(
        applied = report.applied,
        skipped = report.skipped,
        rebuilt = report.rebuilt,
        pending = report.pending_changes,
        "change batch applied"
    );
}
