//! Text normalization applied before keyword matching.

/// Lowercase the input and collapse every maximal run of whitespace into a
/// single space, trimming both ends. Idempotent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
