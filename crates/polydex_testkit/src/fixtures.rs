//! Record fixtures and index helpers.

use polydex_core::{IndexConfig, SearchIndex, SearchResult};
use serde_json::{json, Value};

/// Builds one `{"name": ...}` record per name.
pub fn name_records(names: &[&str]) -> Vec<Value> {
    names.iter().map(|name| json!({ "name": name })).collect()
}

/// A small people collection with nested fields.
pub fn people() -> Vec<Value> {
    vec![
        json!({"name": "Alice", "email": "alice@example.com", "address": {"city": "Paris"}}),
        json!({"name": "Alicia", "email": "alicia@example.org", "address": {"city": "Lyon"}}),
        json!({"name": "Bob", "email": "bob@example.com", "address": {"city": "Berlin"}}),
        json!({"name": "Robert", "email": "robert@example.net"}),
        json!({"name": "Rupert", "address": {"city": "Bern"}}),
    ]
}

/// A small product catalogue with numeric and boolean fields.
pub fn products() -> Vec<Value> {
    vec![
        json!({"sku": 1001, "title": "Mechanical Keyboard", "in_stock": true}),
        json!({"sku": 1002, "title": "Wireless Mouse", "in_stock": false}),
        json!({"sku": 2001, "title": "Keyboard Cover", "in_stock": true}),
        json!({"sku": 2002, "title": "USB Hub"}),
    ]
}

/// Generates `count` records with pairwise distinct names.
pub fn distinct_records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({ "name": format!("user{i:05}"), "id": i }))
        .collect()
}

/// Builds an index with the default configuration.
pub fn built_index(records: Vec<Value>, fields: &[&str]) -> SearchIndex<Value> {
    built_index_with(IndexConfig::default(), records, fields)
}

/// Builds an index with the given configuration.
pub fn built_index_with(
    config: IndexConfig,
    records: Vec<Value>,
    fields: &[&str],
) -> SearchIndex<Value> {
    let mut index = SearchIndex::with_config(config).expect("Invalid test configuration");
    index.build_index(records, fields.iter().copied());
    index
}

/// Extracts result positions in ranked order.
pub fn positions<R>(results: &[SearchResult<'_, R>]) -> Vec<usize> {
    results.iter().map(|r| r.original_index).collect()
}

/// Extracts the `name` field of each result in ranked order.
pub fn result_names(results: &[SearchResult<'_, Value>]) -> Vec<String> {
    results
        .iter()
        .filter_map(|r| r.item.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}
