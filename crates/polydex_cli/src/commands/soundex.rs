//! Soundex command implementation.

use polydex_core::{normalize, soundex};

/// Prints the Soundex code of each word, one per line.
pub fn run(words: &[String]) {
    for (word, code) in encode(words) {
        println!("{code}\t{word}");
    }
}

fn encode(words: &[String]) -> Vec<(&str, String)> {
    words
        .iter()
        .map(|word| {
            let code = soundex(&normalize(word));
            (word.as_str(), if code.is_empty() { "-".to_string() } else { code })
        })
        .collect()
}
