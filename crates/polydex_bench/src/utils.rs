//! Benchmark utilities.

use polydex_core::{Change, SearchIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};

const SYLLABLES: &[&str] = &[
    "al", "an", "be", "ca", "da", "el", "fi", "ga", "ho", "is", "jo", "ka", "li", "ma", "no",
    "or", "pe", "qu", "ri", "sa", "te", "ul", "vi", "wa", "xe", "yo", "zu",
];

const CITIES: &[&str] = &[
    "Paris", "Lyon", "Berlin", "Bern", "Madrid", "Lisbon", "Oslo", "Vienna", "Prague", "Rome",
];

/// Generate a random pronounceable word of 2 to 5 syllables.
pub fn random_word<R: Rng>(rng: &mut R) -> String {
    let syllables = rng.gen_range(2..=5);
    (0..syllables)
        .filter_map(|_| SYLLABLES.choose(rng).copied())
        .collect()
}

/// Generate a random `{name, email, address.city}` record.
pub fn random_record<R: Rng>(rng: &mut R) -> Value {
    let name = random_word(rng);
    let city = CITIES.choose(rng).copied().unwrap_or("Paris");
    json!({
        "name": name,
        "email": format!("{name}@example.com"),
        "address": { "city": city },
    })
}

/// Generate `count` random records.
pub fn generate_records(count: usize) -> Vec<Value> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| random_record(&mut rng)).collect()
}

/// Fields indexed by the benchmarks.
pub const FIELDS: [&str; 3] = ["name", "email", "address.city"];

/// Build an index over `count` random records.
pub fn built_index(count: usize) -> SearchIndex<Value> {
    let mut index = SearchIndex::new();
    index.build_index(generate_records(count), FIELDS);
    index
}

/// Generate a mixed change batch against a store of `len` records.
pub fn generate_changes(count: usize, len: usize) -> Vec<Change<Value>> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let position = rng.gen_range(0..len.max(1));
            match rng.gen_range(0..5) {
                0 => Change::Delete { position },
                1 | 2 => Change::Update {
                    position,
                    item: random_record(&mut rng),
                },
                _ => Change::Add {
                    item: random_record(&mut rng),
                },
            }
        })
        .collect()
}
