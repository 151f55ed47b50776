//! Search command implementation.

use super::{build_from_file, CliError, OutputFormat};
use polydex_core::{IndexConfig, MatchMode, Record, SearchIndex, SearchOptions, SearchResult};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Query parameters for one search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Query string.
    pub query: String,
    /// Match mode.
    pub mode: MatchMode,
    /// Compare raw values case-sensitively.
    pub case_sensitive: bool,
    /// Minimum score filter.
    pub min_score: Option<f64>,
    /// Result limit.
    pub limit: Option<usize>,
}

impl SearchRequest {
    /// Converts the request into engine options.
    pub fn options(&self) -> SearchOptions {
        let mut options = SearchOptions::new(self.mode).case_sensitive(self.case_sensitive);
        if let Some(min_score) = self.min_score {
            options = options.min_score(min_score);
        }
        if let Some(limit) = self.limit {
            options = options.max_results(limit);
        }
        options
    }
}

/// Search command output.
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    /// The query as given.
    pub query: String,
    /// Match mode used.
    pub mode: MatchMode,
    /// Wall-clock search time in microseconds.
    pub took_us: u64,
    /// Ranked hits.
    pub hits: Vec<Hit>,
}

/// One ranked hit.
#[derive(Debug, Serialize)]
pub struct Hit {
    /// Position of the record in the input.
    pub position: usize,
    /// Accumulated score.
    pub score: f64,
    /// Fields that contributed, in match order.
    pub matched_fields: Vec<String>,
    /// The record itself.
    pub item: Value,
}

/// Runs the search command.
pub fn run(
    records: &Path,
    fields: &[String],
    config: IndexConfig,
    request: &SearchRequest,
    format: OutputFormat,
) -> Result<(), CliError> {
    let index = build_from_file(records, fields, config)?;
    let output = execute(&index, request)?;
    print_output(&output, format);
    Ok(())
}

/// Runs `request` against a built index.
pub fn execute(
    index: &SearchIndex<Value>,
    request: &SearchRequest,
) -> Result<SearchOutput, CliError> {
    let results = index.search(&request.query, &request.options())?;
    Ok(to_output(request, &results))
}

pub(crate) fn to_output(
    request: &SearchRequest,
    results: &[SearchResult<'_, Value>],
) -> SearchOutput {
    let took_us = results
        .first()
        .map_or(0, |r| r.search_metadata.search_time.as_micros() as u64);

    SearchOutput {
        query: request.query.clone(),
        mode: request.mode,
        took_us,
        hits: results
            .iter()
            .map(|r| Hit {
                position: r.original_index,
                score: r.score,
                matched_fields: r.matched_fields.clone(),
                item: r.item.clone(),
            })
            .collect(),
    }
}

pub(crate) fn print_output(output: &SearchOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(output) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize output: {e}"),
        },
        OutputFormat::Text => print_text_output(output),
    }
}

fn print_text_output(output: &SearchOutput) {
    println!(
        "{} hit(s) for {:?} ({} mode, {} us)",
        output.hits.len(),
        output.query,
        output.mode,
        output.took_us
    );
    for hit in &output.hits {
        println!(
            "  [{}] score {:.3}  {}  ({})",
            hit.position,
            hit.score,
            summary(&hit.item),
            hit.matched_fields.join(", ")
        );
    }
}

/// Short one-line rendering of a record.
fn summary(item: &Value) -> String {
    match item.field_value(&"name".into()) {
        Some(name) => name.into_owned(),
        None => item.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::people_file;

    fn request(query: &str, mode: MatchMode) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            mode,
            case_sensitive: false,
            min_score: None,
            limit: None,
        }
    }

    #[test]
    fn prefix_search_from_file() {
        let file = people_file();
        let index =
            build_from_file(file.path(), &["name".to_string()], IndexConfig::default()).unwrap();

        let output = execute(&index, &request("alic", MatchMode::Prefix)).unwrap();
        let positions: Vec<_> = output.hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![0, 1]);
        assert!(output.hits.iter().all(|h| h.score == 5.0));
    }

    #[test]
    fn limit_is_applied() {
        let file = people_file();
        let index =
            build_from_file(file.path(), &["name".to_string()], IndexConfig::default()).unwrap();

        let mut req = request("alic", MatchMode::Prefix);
        req.limit = Some(1);
        let output = execute(&index, &req).unwrap();
        assert_eq!(output.hits.len(), 1);
    }

    #[test]
    fn json_output_shape() {
        let file = people_file();
        let index =
            build_from_file(file.path(), &["name".to_string()], IndexConfig::default()).unwrap();

        let output = execute(&index, &request("bob", MatchMode::Exact)).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["mode"], "exact");
        assert_eq!(json["hits"][0]["position"], 2);
        assert_eq!(json["hits"][0]["item"]["name"], "Bob");
        assert_eq!(json["hits"][0]["matched_fields"][0], "name");
    }

    #[test]
    fn summary_prefers_name() {
        assert_eq!(summary(&serde_json::json!({"name": "Ann", "x": 1})), "Ann");
        assert_eq!(summary(&serde_json::json!({"x": 1})), r#"{"x":1}"#);
    }
}
