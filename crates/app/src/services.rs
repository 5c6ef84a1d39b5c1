//! Application services — one use case per hub script.
//!
//! Each service borrows the hub ports it needs and owns its settings, which
//! deserialize from the matching configuration section with every field
//! defaulted.

pub mod clock;
pub mod color;
pub mod color_temperature;
pub mod dim;
pub mod flow;
pub mod light_status;
pub mod non_reporting;
pub mod presence;
pub mod random_color;
pub mod zone_activity;

mod level;

use std::time::Duration;

/// Transition length from a seconds setting. Negative or non-finite values
/// mean no transition.
pub(crate) fn transition_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
