//! Fallback aggregation for devices lacking the primary capability.
//!
//! A dim command cannot reach an on/off-only lamp, so those lamps follow the
//! average of the levels that were actually issued.

/// Decide the on/off state of fallback devices.
///
/// `threshold` is normalized (`0.6` for 60 %). Returns `None` when the
/// feature is disabled (`threshold <= 0`) or nothing was issued; otherwise
/// whether the mean of `issued` meets or exceeds `threshold`.
#[must_use]
pub fn aggregate(issued: &[f64], threshold: f64) -> Option<bool> {
    if threshold <= 0.0 || issued.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = issued.iter().sum::<f64>() / issued.len() as f64;
    Some(mean >= threshold)
}

/// Convert a percentage setting (`60`) into the normalized threshold.
#[must_use]
pub fn threshold_from_percent(percent: u8) -> f64 {
    f64::from(percent) / 100.0
}
