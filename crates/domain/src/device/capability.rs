//! Capability identifiers.

use std::borrow::Cow;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// A named controllable or readable property of a device (`dim`, `onoff`, …).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    pub const DIM: Self = Self(Cow::Borrowed("dim"));
    pub const ONOFF: Self = Self(Cow::Borrowed("onoff"));
    pub const LIGHT_TEMPERATURE: Self = Self(Cow::Borrowed("light_temperature"));
    pub const LIGHT_HUE: Self = Self(Cow::Borrowed("light_hue"));
    pub const LIGHT_SATURATION: Self = Self(Cow::Borrowed("light_saturation"));
    pub const MEASURE_BATTERY: Self = Self(Cow::Borrowed("measure_battery"));

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Valid range of a normalized numeric capability, if it has one.
    #[must_use]
    pub fn range(&self) -> Option<RangeInclusive<f64>> {
        match self.as_str() {
            "dim" | "light_temperature" | "light_hue" | "light_saturation" => Some(0.0..=1.0),
            _ => None,
        }
    }

    /// Clamp `value` into this capability's range (unchanged if unbounded).
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        match self.range() {
            Some(range) => value.clamp(*range.start(), *range.end()),
            None => value,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Capability {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compare_constants_with_parsed_ids() {
        assert_eq!(Capability::DIM, Capability::from("dim"));
        assert_ne!(Capability::DIM, Capability::ONOFF);
    }

    #[test]
    fn should_clamp_dim_into_unit_range() {
        assert!((Capability::clamp(&Capability::DIM, 1.4) - 1.0).abs() < f64::EPSILON);
        assert!(Capability::clamp(&Capability::DIM, -0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn should_leave_unbounded_capability_untouched() {
        let cap = Capability::from("measure_power");
        assert!(cap.range().is_none());
        assert!((Capability::clamp(&cap, 1500.0) - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let json = serde_json::to_string(&Capability::LIGHT_HUE).unwrap();
        assert_eq!(json, "\"light_hue\"");
        let parsed: Capability = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Capability::LIGHT_HUE);
    }
}
