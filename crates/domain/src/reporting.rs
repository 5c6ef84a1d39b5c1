//! Reporting policy — which devices count as unresponsive.
//!
//! A device is unresponsive when none of its capabilities reported within
//! the threshold. Devices that report nothing but their battery level wake
//! up rarely and get their own, longer threshold.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::argument::leading_integer;
use crate::device::Device;
use crate::error::ArgumentError;
use crate::time::Timestamp;

pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_BATTERY_DAYS: u32 = 20;
pub const DEFAULT_TAG: &str = "Unresponsive Devices";

/// `|`-separated substrings; a text matches when it contains any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PatternList(Vec<String>);

impl PatternList {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split('|')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.0.iter().any(|pattern| text.contains(pattern.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for PatternList {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PatternList> for String {
    fn from(value: PatternList) -> Self {
        value.0.join("|")
    }
}

/// Silence thresholds in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub days: u32,
    pub battery_days: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            battery_days: DEFAULT_BATTERY_DAYS,
        }
    }
}

impl Thresholds {
    /// Override `defaults` from a `days` or `days|battery_days` argument.
    /// No argument keeps the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::NotANumber`] when a given part is not a
    /// non-negative integer.
    pub fn parse(raw: Option<&str>, defaults: Self) -> Result<Self, ArgumentError> {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Ok(defaults);
        };
        let mut parts = raw.split('|');
        let days = parts.next().map(days_from).transpose()?;
        let battery_days = parts.next().map(days_from).transpose()?;
        Ok(Self {
            days: days.unwrap_or(defaults.days),
            battery_days: battery_days.unwrap_or(defaults.battery_days),
        })
    }
}

fn days_from(token: &str) -> Result<u32, ArgumentError> {
    leading_integer(token)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ArgumentError::NotANumber {
            token: token.to_string(),
        })
}

/// Full set of rules for the non-reporting check.
#[derive(Debug, Clone, Default)]
pub struct ReportingPolicy {
    pub thresholds: Thresholds,
    pub ignored_names: PatternList,
    pub ignored_apps: PatternList,
    pub ignored_classes: PatternList,
}

impl ReportingPolicy {
    /// Devices without capabilities or matching an ignore pattern are never
    /// reported.
    #[must_use]
    pub fn is_ignored(&self, device: &Device) -> bool {
        device.capabilities.is_empty()
            || self.ignored_names.matches(&device.name)
            || self.ignored_apps.matches(&device.owner_uri)
            || device
                .class
                .as_deref()
                .is_some_and(|class| self.ignored_classes.matches(class))
    }

    /// Whether `device` stayed silent past its threshold at `now`.
    ///
    /// A device that never reported counts as silent.
    #[must_use]
    pub fn is_unresponsive(&self, device: &Device, now: Timestamp) -> bool {
        if self.is_ignored(device) {
            return false;
        }
        let days = if device.reports_battery_only() {
            self.thresholds.battery_days
        } else {
            self.thresholds.days
        };
        let cutoff = now - Duration::days(i64::from(days));
        device.last_reported().is_none_or(|last| last <= cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Capability;
    use crate::time::from_millis;

    const DAY_MS: i64 = 86_400_000;

    fn now() -> Timestamp {
        from_millis(100 * DAY_MS)
    }

    fn sensor(last_report_day: i64) -> Device {
        Device::builder()
            .id("s")
            .name("Door sensor")
            .zone("z")
            .class("sensor")
            .owner_uri("homey:app:com.example")
            .reported(Capability::new("alarm_contact"), false, from_millis(last_report_day * DAY_MS))
            .reported(Capability::MEASURE_BATTERY, 90.0, from_millis(last_report_day * DAY_MS))
            .build()
            .unwrap()
    }

    fn battery_only(last_report_day: i64) -> Device {
        Device::builder()
            .id("b")
            .name("Button")
            .zone("z")
            .reported(Capability::MEASURE_BATTERY, 50.0, from_millis(last_report_day * DAY_MS))
            .build()
            .unwrap()
    }

    #[test]
    fn should_keep_defaults_without_argument() {
        let thresholds = Thresholds::parse(None, Thresholds::default()).unwrap();
        assert_eq!(thresholds, Thresholds { days: 7, battery_days: 20 });
    }

    #[test]
    fn should_override_first_threshold_only() {
        let thresholds = Thresholds::parse(Some("3"), Thresholds::default()).unwrap();
        assert_eq!(thresholds, Thresholds { days: 3, battery_days: 20 });
    }

    #[test]
    fn should_override_both_thresholds() {
        let thresholds = Thresholds::parse(Some("3|30"), Thresholds::default()).unwrap();
        assert_eq!(thresholds, Thresholds { days: 3, battery_days: 30 });
    }

    #[test]
    fn should_fail_when_threshold_not_a_number() {
        let result = Thresholds::parse(Some("3|soon"), Thresholds::default());
        assert_eq!(
            result,
            Err(ArgumentError::NotANumber {
                token: "soon".to_string()
            })
        );
    }

    #[test]
    fn should_report_device_silent_past_threshold() {
        let policy = ReportingPolicy::default();
        assert!(policy.is_unresponsive(&sensor(90), now()));
        assert!(policy.is_unresponsive(&sensor(93), now()));
        assert!(!policy.is_unresponsive(&sensor(94), now()));
    }

    #[test]
    fn should_use_battery_threshold_for_battery_only_devices() {
        let policy = ReportingPolicy::default();
        assert!(!policy.is_unresponsive(&battery_only(90), now()));
        assert!(policy.is_unresponsive(&battery_only(79), now()));
    }

    #[test]
    fn should_skip_devices_matching_ignore_patterns() {
        let policy = ReportingPolicy {
            ignored_apps: PatternList::parse("vdevice|com.example"),
            ..ReportingPolicy::default()
        };
        assert!(policy.is_ignored(&sensor(0)));
        assert!(!policy.is_unresponsive(&sensor(0), now()));

        let policy = ReportingPolicy {
            ignored_names: PatternList::parse("Door"),
            ..ReportingPolicy::default()
        };
        assert!(policy.is_ignored(&sensor(0)));
    }

    #[test]
    fn should_skip_devices_without_capabilities() {
        let device = Device::builder().name("Bare").build().unwrap();
        assert!(!ReportingPolicy::default().is_unresponsive(&device, now()));
    }

    #[test]
    fn should_treat_empty_pattern_list_as_matching_nothing() {
        let patterns = PatternList::parse("");
        assert!(patterns.is_empty());
        assert!(!patterns.matches("anything"));
    }
}
