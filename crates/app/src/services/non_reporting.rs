//! Non-reporting service — finds devices that stopped reporting.
//!
//! Argument (optional): `days` or `days|battery_days`. Writes one
//! `"<device> - <zone>"` line per silent device to a tag and returns whether
//! any device was found.

use serde::{Deserialize, Serialize};
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::reporting::{
    DEFAULT_BATTERY_DAYS, DEFAULT_DAYS, DEFAULT_TAG, PatternList, ReportingPolicy, Thresholds,
};
use zonehub_domain::time::Timestamp;
use zonehub_domain::zone::ZoneTree;

use crate::ports::{DeviceRepository, TagWriter, ZoneRepository};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonReportingSettings {
    pub days: u32,
    pub battery_days: u32,
    /// `|`-separated name fragments to skip.
    pub ignored_names: PatternList,
    /// `|`-separated owner app fragments to skip.
    pub ignored_apps: PatternList,
    pub ignored_classes: PatternList,
    pub tag_name: String,
}

impl Default for NonReportingSettings {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            battery_days: DEFAULT_BATTERY_DAYS,
            ignored_names: PatternList::default(),
            ignored_apps: PatternList::parse("vdevice|com.arjankranenburg.virtual"),
            ignored_classes: PatternList::default(),
            tag_name: DEFAULT_TAG.to_string(),
        }
    }
}

/// A device that stayed silent too long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilentDevice {
    pub name: String,
    pub zone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonReportingReport {
    pub devices: Vec<SilentDevice>,
    /// Text written to the tag.
    pub text: String,
}

impl NonReportingReport {
    #[must_use]
    pub fn any(&self) -> bool {
        !self.devices.is_empty()
    }
}

pub struct NonReportingService<'a, H> {
    hub: &'a H,
    settings: NonReportingSettings,
}

impl<'a, H> NonReportingService<'a, H>
where
    H: DeviceRepository + ZoneRepository + TagWriter + Sync,
{
    pub fn new(hub: &'a H, settings: NonReportingSettings) -> Self {
        Self { hub, settings }
    }

    /// # Errors
    ///
    /// Returns [`ZoneHubError::Argument`] when a threshold is not a number,
    /// or a repository/tag error.
    #[tracing::instrument(skip(self, now))]
    pub async fn run(
        &self,
        argument: Option<&str>,
        now: Timestamp,
    ) -> Result<NonReportingReport, ZoneHubError> {
        let defaults = Thresholds {
            days: self.settings.days,
            battery_days: self.settings.battery_days,
        };
        let policy = ReportingPolicy {
            thresholds: Thresholds::parse(argument, defaults)?,
            ignored_names: self.settings.ignored_names.clone(),
            ignored_apps: self.settings.ignored_apps.clone(),
            ignored_classes: self.settings.ignored_classes.clone(),
        };

        let tree = ZoneTree::new(self.hub.get_all_zones().await?);
        let devices = self.hub.get_all_devices().await?;

        let silent: Vec<SilentDevice> = devices
            .iter()
            .filter(|device| policy.is_unresponsive(device, now))
            .map(|device| SilentDevice {
                name: device.name.clone(),
                zone: tree
                    .name_of(&device.zone)
                    .map_or_else(|| device.zone.to_string(), str::to_string),
            })
            .collect();

        let text: String = silent
            .iter()
            .map(|device| format!("{} - {}\n", device.name, device.zone))
            .collect();
        tracing::info!(count = silent.len(), "found non-reporting devices");

        self.hub.write_tag(&self.settings.tag_name, &text).await?;
        Ok(NonReportingReport {
            devices: silent,
            text,
        })
    }
}
