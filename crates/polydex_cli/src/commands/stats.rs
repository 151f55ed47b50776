//! Stats command implementation.

use super::{build_from_file, CliError, OutputFormat};
use polydex_core::{IndexConfig, IndexStats};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Runs the stats command.
pub fn run(
    records: &Path,
    fields: &[String],
    config: IndexConfig,
    format: OutputFormat,
) -> Result<(), CliError> {
    let index = build_from_file(records, fields, config)?;
    let stats = index.stats();

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&stats) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize stats: {e}"),
        },
        OutputFormat::Text => print_text_output(&stats, fields),
    }

    Ok(())
}

pub(crate) fn print_text_output(stats: &IndexStats, fields: &[String]) {
    println!("Polydex Index Statistics");
    println!("========================");
    println!();
    println!("Fields: {}", fields.join(", "));
    println!("Records: {}", stats.record_count);
    println!();
    println!("Keys:");
    println!("  Exact:    {}", stats.keys_per_kind.exact);
    println!("  Prefix:   {}", stats.keys_per_kind.prefix);
    println!("  N-gram:   {}", stats.keys_per_kind.ngram);
    println!("  Phonetic: {}", stats.keys_per_kind.phonetic);
    println!("  Unique:   {}", stats.unique_keys);
    println!("  Average key length: {:.1}", stats.average_key_length);
    println!();
    println!("Entries: {}", stats.total_entries);
    println!("Estimated memory: {}", format_size(stats.memory_usage));
    println!();
    println!("Rebuilds: {}", stats.rebuilds);
    println!("Last build took: {:?}", stats.last_build_duration);
    match stats
        .last_rebuild
        .and_then(|at| at.duration_since(UNIX_EPOCH).ok())
    {
        Some(since_epoch) => println!("Last rebuild: {} ms since epoch", since_epoch.as_millis()),
        None => println!("Last rebuild: never"),
    }
    println!("Pending changes: {}", stats.pending_changes);
}

fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::people_file;

    #[test]
    fn formats_sizes() {
        assert_eq!(format_size(300), "300 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn stats_serialize_to_json() {
        let file = people_file();
        let index =
            build_from_file(file.path(), &["name".to_string()], IndexConfig::default()).unwrap();
        let json = serde_json::to_value(index.stats()).unwrap();
        assert_eq!(json["record_count"], 3);
        assert_eq!(json["keys_per_kind"]["exact"], 3);
        assert_eq!(json["rebuilds"], 1);
    }

    #[test]
    fn run_accepts_both_formats() {
        let file = people_file();
        let fields = ["name".to_string()];
        run(file.path(), &fields, IndexConfig::default(), OutputFormat::Text).unwrap();
        run(file.path(), &fields, IndexConfig::default(), OutputFormat::Json).unwrap();
    }
}
