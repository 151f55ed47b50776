//! Query routing and ranking.
//!
//! A query is dispatched to exactly one index per field, chosen by the
//! [`MatchMode`]. Matches for the same record accumulate additively into a
//! single [`SearchResult`]; results are then ranked by descending score with
//! ties keeping discovery order.

use crate::engine::SearchIndex;
use crate::error::{CoreError, CoreResult};
use crate::index::{composite_key, ngrams, soundex, truncate_chars, IndexKind};
use crate::record::{normalize, FieldPath, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::trace;

/// Score contributed by an exact match.
pub const EXACT_WEIGHT: f64 = 10.0;
/// Score contributed by a prefix match.
pub const PREFIX_WEIGHT: f64 = 5.0;
/// Score contributed by a phonetic match.
pub const FUZZY_WEIGHT: f64 = 2.0;

/// Which index a query consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Whole-value equality (exact index, weight 10).
    #[default]
    Exact,
    /// Leading substring (prefix index, weight 5).
    Prefix,
    /// Shared n-grams (n-gram index, fraction of query grams matched).
    Partial,
    /// Same Soundex code (phonetic index, weight 2).
    Fuzzy,
}

impl MatchMode {
    /// Returns the index kind this mode consults.
    pub fn index_kind(self) -> IndexKind {
        match self {
            MatchMode::Exact => IndexKind::Exact,
            MatchMode::Prefix => IndexKind::Prefix,
            MatchMode::Partial => IndexKind::NGram,
            MatchMode::Fuzzy => IndexKind::Phonetic,
        }
    }

    /// Returns the lowercase name of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Prefix => "prefix",
            MatchMode::Partial => "partial",
            MatchMode::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "prefix" => Ok(MatchMode::Prefix),
            "partial" => Ok(MatchMode::Partial),
            "fuzzy" => Ok(MatchMode::Fuzzy),
            _ => Err(CoreError::unknown_match_mode(s)),
        }
    }
}

/// Options for a single search call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Restrict the search to these fields. `None` searches every indexed field.
    pub fields: Option<Vec<String>>,
    /// Verify matches against the original (un-lowercased) values.
    pub case_sensitive: bool,
    /// Which index to consult.
    pub match_mode: MatchMode,
    /// Drop results scoring below this value, before `max_results` applies.
    pub min_score: Option<f64>,
    /// Keep at most this many results.
    pub max_results: Option<usize>,
}

impl SearchOptions {
    /// Creates options for the given match mode.
    #[must_use]
    pub fn new(match_mode: MatchMode) -> Self {
        Self {
            match_mode,
            ..Self::default()
        }
    }

    /// Restricts the searched fields.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets case sensitivity.
    #[must_use]
    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    /// Sets the minimum score.
    #[must_use]
    pub fn min_score(mut self, score: f64) -> Self {
        self.min_score = Some(score);
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn max_results(mut self, limit: usize) -> Self {
        self.max_results = Some(limit);
        self
    }
}

/// Metadata attached to every result of a search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchMetadata {
    /// Always true: results come from the indices, never a scan.
    pub used_index: bool,
    /// Wall-clock time of the whole search call.
    pub search_time: Duration,
    /// Always false: caching belongs to the caller.
    pub cache_hit: bool,
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<'a, R> {
    /// The matched record.
    pub item: &'a R,
    /// Accumulated score.
    pub score: f64,
    /// Field names that contributed, in match order. May repeat.
    pub matched_fields: Vec<String>,
    /// Position of the record in the backing store.
    pub original_index: usize,
    /// Call-level metadata.
    pub search_metadata: SearchMetadata,
}

/// Per-record accumulation in discovery order.
#[derive(Default)]
struct Accumulator {
    slots: HashMap<usize, usize>,
    hits: Vec<(usize, f64, Vec<String>)>,
}

impl Accumulator {
    fn add(&mut self, position: usize, weight: f64, field: &FieldPath) {
        let slot = *self.slots.entry(position).or_insert_with(|| {
            self.hits.push((position, 0.0, Vec::new()));
            self.hits.len() - 1
        });
        let (_, score, fields) = &mut self.hits[slot];
        *score += weight;
        fields.push(field.as_str().to_string());
    }
}

impl<R: Record> SearchIndex<R> {
    /// Searches the index.
    ///
    /// Fails with [`CoreError::IndexNotReady`] if the index was never built
    /// or indexing is disabled. Under
    /// [`RemovalStrategy::MarkForRebuild`](crate::RemovalStrategy) results
    /// may include stale matches after updates or deletes until the next
    /// rebuild; positions that no longer exist in the backing store are
    /// dropped.
    pub fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> CoreResult<Vec<SearchResult<'_, R>>> {
        let started = Instant::now();

        if !self.config.enabled {
            return Err(CoreError::index_not_ready("indexing is disabled"));
        }
        if !self.ready {
            return Err(CoreError::index_not_ready("build_index has not been called"));
        }
        self.stats.record_search();

        if query.is_empty() {
            return Ok(Vec::new());
        }

        let fields = self.search_fields(options);
        let normalized = normalize(query);
        let mut acc = Accumulator::default();

        for field in &fields {
            match options.match_mode {
                MatchMode::Exact => {
                    self.match_exact(field, query, &normalized, options, &mut acc)
                }
                MatchMode::Prefix => {
                    self.match_prefix(field, query, &normalized, options, &mut acc)
                }
                MatchMode::Partial => {
                    self.match_partial(field, query, &normalized, options, &mut acc)
                }
                MatchMode::Fuzzy => self.match_fuzzy(field, &normalized, &mut acc),
            }
        }

        let mut results: Vec<SearchResult<'_, R>> = acc
            .hits
            .into_iter()
            .filter_map(|(position, score, matched_fields)| {
                // Stale positions past the end of the store have no item.
                let item = self.records.get(position)?;
                Some(SearchResult {
                    item,
                    score,
                    matched_fields,
                    original_index: position,
                    search_metadata: SearchMetadata {
                        used_index: true,
                        search_time: Duration::ZERO,
                        cache_hit: false,
                    },
                })
            })
            .collect();

        // Stable: ties keep discovery order.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        if let Some(min_score) = options.min_score {
            results.retain(|r| r.score >= min_score);
            if let Some(limit) = options.max_results {
                results.truncate(limit);
            }
        } else if let Some(limit) = options.max_results {
            results.truncate(limit);
        }

        let search_time = started.elapsed();
        for result in &mut results {
            result.search_metadata.search_time = search_time;
        }

        trace!(
            query,
            mode = %options.match_mode,
            results = results.len(),
            took_us = search_time.as_micros() as u64,
            "search complete"
        );

        Ok(results)
    }

    fn search_fields(&self, options: &SearchOptions) -> Vec<FieldPath> {
        match &options.fields {
            Some(fields) => fields.iter().map(|f| FieldPath::parse(f)).collect(),
            None => self.fields.clone(),
        }
    }

    /// Reads the raw value of `field` at `position` and applies `check`.
    fn raw_value_matches(
        &self,
        position: usize,
        field: &FieldPath,
        check: impl FnOnce(&str) -> bool,
    ) -> bool {
        self.records
            .get(position)
            .and_then(|record| record.field_value(field))
            .is_some_and(|raw| check(&raw))
    }

    fn lookup(&self, kind: IndexKind, field: &FieldPath, value: &str) -> &[usize] {
        self.indices.get(kind).lookup(&composite_key(field, value))
    }

    fn match_exact(
        &self,
        field: &FieldPath,
        query: &str,
        normalized: &str,
        options: &SearchOptions,
        acc: &mut Accumulator,
    ) {
        for &position in self.lookup(IndexKind::Exact, field, normalized) {
            if options.case_sensitive
                && !self.raw_value_matches(position, field, |raw| raw == query)
            {
                continue;
            }
            acc.add(position, EXACT_WEIGHT, field);
        }
    }

    fn match_prefix(
        &self,
        field: &FieldPath,
        query: &str,
        normalized: &str,
        options: &SearchOptions,
        acc: &mut Accumulator,
    ) {
        let truncated = truncate_chars(normalized, self.config.max_prefix_len);
        let over_long = truncated.len() < normalized.len();

        for &position in self.lookup(IndexKind::Prefix, field, truncated) {
            if over_long
                && !self.raw_value_matches(position, field, |raw| {
                    normalize(raw).starts_with(normalized)
                })
            {
                continue;
            }
            if options.case_sensitive
                && !self.raw_value_matches(position, field, |raw| raw.starts_with(query))
            {
                continue;
            }
            acc.add(position, PREFIX_WEIGHT, field);
        }
    }

    fn match_partial(
        &self,
        field: &FieldPath,
        query: &str,
        normalized: &str,
        options: &SearchOptions,
        acc: &mut Accumulator,
    ) {
        let n = self.config.ngram_size;

        // Every query gram counts, repeats included, so a repeated gram that
        // matches contributes once per occurrence.
        if options.case_sensitive {
            // Grams come from the raw query so they can be checked verbatim.
            let grams = ngrams(query, n);
            let weight = 1.0 / grams.len() as f64;
            for gram in grams {
                for &position in self.lookup(IndexKind::NGram, field, &normalize(gram)) {
                    if self.raw_value_matches(position, field, |raw| raw.contains(gram)) {
                        acc.add(position, weight, field);
                    }
                }
            }
        } else {
            let grams = ngrams(normalized, n);
            let weight = 1.0 / grams.len() as f64;
            for gram in grams {
                for &position in self.lookup(IndexKind::NGram, field, gram) {
                    acc.add(position, weight, field);
                }
            }
        }
    }

    fn match_fuzzy(&self, field: &FieldPath, normalized: &str, acc: &mut Accumulator) {
        let code = soundex(normalized);
        if code.is_empty() {
            return;
        }
        for &position in self.lookup(IndexKind::Phonetic, field, &code) {
            acc.add(position, FUZZY_WEIGHT, field);
        }
    }
}
