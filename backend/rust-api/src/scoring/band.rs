use crate::error::{ServiceError, ServiceResult};

/// Minimum percentage for each band, highest first.
pub const BAND_THRESHOLDS: [(u64, f64); 6] = [
    (90, 9.0),
    (80, 8.0),
    (70, 7.0),
    (60, 6.0),
    (50, 5.0),
    (40, 4.0),
];

/// Band awarded below the lowest threshold.
pub const MIN_BAND: f64 = 3.0;

/// Converts a raw correct count into a whole band.
///
/// `total` must be positive. The percentage check runs on integers
/// (`correct * 100 >= threshold * total`) so boundaries are exact.
pub fn band_score(correct: u32, total: u32) -> ServiceResult<f64> {
    if total == 0 {
        return Err(ServiceError::PreconditionViolation(
            "total question count must be greater than zero".to_string(),
        ));
    }

    let scaled = u64::from(correct) * 100;
    let total = u64::from(total);

    let band = BAND_THRESHOLDS
        .iter()
        .find(|(threshold, _)| scaled >= threshold * total)
        .map(|(_, band)| *band)
        .unwrap_or(MIN_BAND);

    Ok(band)
}
