//! Near-duplicate detection for candidate rewrites.

use std::collections::HashSet;

/// Token Jaccard similarity at or above this counts as a duplicate.
pub const DUPLICATE_THRESHOLD: f64 = 0.9;

/// Lowercase, punctuation stripped, whitespace collapsed.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '%' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn tokens(normalized: &str) -> HashSet<&str> {
    normalized.split_whitespace().collect()
}

pub fn jaccard(a: &str, b: &str) -> f64 {
    let (na, nb) = (normalize(a), normalize(b));
    let (ta, tb) = (tokens(&na), tokens(&nb));
    if ta.is_empty() && tb.is_empty() {
        return 1.0;
    }
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    intersection as f64 / union as f64
}

pub fn is_duplicate(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b) || jaccard(a, b) >= DUPLICATE_THRESHOLD
}
