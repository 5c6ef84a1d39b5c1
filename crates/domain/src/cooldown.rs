//! Cooldown bookkeeping — when each device may be commanded again.
//!
//! The table serializes as a flat JSON object `{ "<device id>": <epoch ms> }`.
//! Entries are overwritten on every schedule and never pruned.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::DeviceId;
use crate::time::{Timestamp, from_millis};

/// Bounds of the random delay between two changes of the same device, in
/// whole seconds. The drawn delay lies in `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownInterval {
    min: u64,
    max: u64,
}

impl CooldownInterval {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvertedInterval`] when `min > max`.
    pub fn new(min: u64, max: u64) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvertedInterval { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> u64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Whether the interval has a single possible value (`min == max`).
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

/// Next-eligible time per device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CooldownTable {
    entries: BTreeMap<DeviceId, i64>,
}

impl CooldownTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When `device_id` becomes eligible again, if it was ever scheduled.
    #[must_use]
    pub fn next_eligible(&self, device_id: &DeviceId) -> Option<Timestamp> {
        self.entries.get(device_id).copied().map(from_millis)
    }

    /// Devices never scheduled are always eligible; otherwise `now` must
    /// have reached the stored time.
    #[must_use]
    pub fn is_eligible(&self, device_id: &DeviceId, now: Timestamp) -> bool {
        self.entries
            .get(device_id)
            .is_none_or(|next| now.timestamp_millis() >= *next)
    }

    /// Store `now + delay` as the next eligible time of `device_id`.
    pub fn schedule(&mut self, device_id: DeviceId, now: Timestamp, delay: Duration) {
        let delay = i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);
        let next = now.timestamp_millis().saturating_add(delay);
        self.entries.insert(device_id, next);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
