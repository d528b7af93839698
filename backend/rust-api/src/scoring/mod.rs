//! Pure scoring rules: raw-score to band conversion, answer-key comparison
//! and the small numeric helpers shared by the evaluator and progress report.

pub mod band;
pub mod responses;

pub use band::{band_score, BAND_THRESHOLDS, MIN_BAND};
pub use responses::score_responses;

/// Counts whitespace-separated, non-empty tokens.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Rounds to one decimal place, the precision bands are reported at.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
