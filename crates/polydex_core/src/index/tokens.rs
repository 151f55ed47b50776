//! Key generation for the four index kinds.

use super::phonetic::soundex;
use super::IndexKind;
use crate::record::FieldPath;

/// Builds the composite `"field:value"` key.
pub fn composite_key(field: &FieldPath, value: &str) -> String {
    format!("{}:{}", field.as_str(), value)
}

/// Returns the prefixes of `value` of length 1 through `max_len` characters.
pub fn prefixes(value: &str, max_len: usize) -> Vec<&str> {
    value
        .char_indices()
        .skip(1)
        .map(|(i, _)| i)
        .chain(std::iter::once(value.len()))
        .take(max_len)
        .filter(|&end| end > 0)
        .map(|end| &value[..end])
        .collect()
}

/// Returns the first `max_len` characters of `value`.
pub fn truncate_chars(value: &str, max_len: usize) -> &str {
    match value.char_indices().nth(max_len) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// Returns every contiguous `n`-character substring of `value`.
///
/// Values shorter than `n` characters produce a single gram holding the
/// whole value, so even the empty string yields one (empty) gram.
pub fn ngrams(value: &str, n: usize) -> Vec<&str> {
    let bounds: Vec<usize> = value
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(value.len()))
        .collect();
    let char_count = bounds.len() - 1;

    if char_count < n || n == 0 {
        return vec![value];
    }

    (0..=char_count - n)
        .map(|start| &value[bounds[start]..bounds[start + n]])
        .collect()
}

/// Generates every key a normalized `value` of `field` contributes.
pub fn index_keys(
    field: &FieldPath,
    value: &str,
    max_prefix_len: usize,
    ngram_size: usize,
) -> Vec<(IndexKind, String)> {
    let mut keys = vec![(IndexKind::Exact, composite_key(field, value))];

    keys.extend(
        prefixes(value, max_prefix_len)
            .into_iter()
            .map(|prefix| (IndexKind::Prefix, composite_key(field, prefix))),
    );

    keys.extend(
        ngrams(value, ngram_size)
            .into_iter()
            .map(|gram| (IndexKind::NGram, composite_key(field, gram))),
    );

    let code = soundex(value);
    if !code.is_empty() {
        keys.push((IndexKind::Phonetic, composite_key(field, &code)));
    }

    keys
}
