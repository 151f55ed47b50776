//! Brute-force reference model for search.
//!
//! The oracle scans every record on every query and scores it with the same
//! weights as the indexed router. A freshly built index must agree with it
//! exactly; an index maintained incrementally must agree with it after a
//! rebuild, or at any time under precise removal.

use polydex_core::index::ngrams;
use polydex_core::{
    normalize, soundex, FieldPath, MatchMode, Record, SearchResult, EXACT_WEIGHT, FUZZY_WEIGHT,
    PREFIX_WEIGHT,
};
use std::collections::BTreeMap;

/// Scores accumulated per record position.
pub type ScoreMap = BTreeMap<usize, f64>;

/// Scans `records` and returns the case-insensitive score of every matching
/// record.
pub fn oracle_scores<R: Record>(
    records: &[R],
    fields: &[&str],
    query: &str,
    mode: MatchMode,
    ngram_size: usize,
) -> ScoreMap {
    let mut scores = ScoreMap::new();
    if query.is_empty() {
        return scores;
    }

    let query = normalize(query);
    let fields: Vec<FieldPath> = fields.iter().map(|f| FieldPath::parse(f)).collect();

    for (position, record) in records.iter().enumerate() {
        let mut score = 0.0;
        let mut matched = false;

        for field in &fields {
            let Some(raw) = record.field_value(field) else {
                continue;
            };
            let value = normalize(&raw);

            match mode {
                MatchMode::Exact => {
                    if value == query {
                        score += EXACT_WEIGHT;
                        matched = true;
                    }
                }
                MatchMode::Prefix => {
                    if !value.is_empty() && value.starts_with(&query) {
                        score += PREFIX_WEIGHT;
                        matched = true;
                    }
                }
                MatchMode::Partial => {
                    let value_grams = ngrams(&value, ngram_size);
                    let grams = ngrams(&query, ngram_size);
                    let weight = 1.0 / grams.len() as f64;
                    for gram in grams {
                        if value_grams.contains(&gram) {
                            score += weight;
                            matched = true;
                        }
                    }
                }
                MatchMode::Fuzzy => {
                    let code = soundex(&query);
                    if !code.is_empty() && soundex(&value) == code {
                        score += FUZZY_WEIGHT;
                        matched = true;
                    }
                }
            }
        }

        if matched {
            scores.insert(position, score);
        }
    }

    scores
}

/// Collects search results into a [`ScoreMap`].
pub fn result_scores<R>(results: &[SearchResult<'_, R>]) -> ScoreMap {
    results
        .iter()
        .map(|r| (r.original_index, r.score))
        .collect()
}

/// Returns true if both maps hold the same positions with scores within
/// `1e-9` of each other.
pub fn scores_match(left: &ScoreMap, right: &ScoreMap) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|((lp, ls), (rp, rs))| lp == rp && (ls - rs).abs() < 1e-9)
}
