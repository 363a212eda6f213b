//! Confidence scoring: a fixed linear blend of match counts and text length.

/// Weight of the primary keyword component.
const PRIMARY_WEIGHT: f64 = 0.7;
/// Weight of the secondary keyword component.
const SECONDARY_WEIGHT: f64 = 0.2;
/// Weight of the text length component.
const LENGTH_WEIGHT: f64 = 0.1;

/// Primary category count at which the primary component saturates.
const PRIMARY_SATURATION: f64 = 2.0;
/// Secondary keyword count at which the secondary component saturates.
const SECONDARY_SATURATION: f64 = 3.0;
/// Normalized char count at which the length component saturates.
const LENGTH_SATURATION: f64 = 100.0;

/// Scoring outcome. The boolean gate is decoupled from the numeric score:
/// `is_receipt` depends only on the primary count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub is_receipt: bool,
    pub confidence: f64,
    pub primary_count: usize,
    pub secondary_count: usize,
    pub text_len: usize,
}

/// Blend the three components and round to two decimals. One primary hit
/// makes a receipt even at low confidence; any number of secondary hits
/// alone never does.
pub fn score(primary_count: usize, secondary_count: usize, text_len: usize) -> ScoreResult {
    let primary = saturating_ratio(primary_count as f64, PRIMARY_SATURATION) * PRIMARY_WEIGHT;
    let secondary =
        saturating_ratio(secondary_count as f64, SECONDARY_SATURATION) * SECONDARY_WEIGHT;
    let length = saturating_ratio(text_len as f64, LENGTH_SATURATION) * LENGTH_WEIGHT;

    ScoreResult {
        is_receipt: primary_count > 0,
        confidence: round2(primary + secondary + length),
        primary_count,
        secondary_count,
        text_len,
    }
}

fn saturating_ratio(value: f64, saturation: f64) -> f64 {
    (value / saturation).min(1.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
