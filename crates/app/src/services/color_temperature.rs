//! Colour temperature service — sets `light_temperature` in zones.
//!
//! Argument: `percent|zone|zone…`; a signed percentage shifts the current
//! temperature, a bare one replaces it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use zonehub_domain::command::CommandKind;
use zonehub_domain::device::{Capability, LIGHT_CLASS};
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::filter::GroupPolicy;
use zonehub_domain::level::LevelArgument;

use super::level::level_commands;
use super::transition_from_secs;
use crate::dispatcher::{CommandDispatcher, DispatchPolicy, DispatchReport};
use crate::ports::{DeviceControl, DeviceRepository, ZoneRepository};
use crate::targeting::{HubSnapshot, TargetingSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTemperatureSettings {
    pub transition_secs: f64,
    #[serde(flatten)]
    pub targeting: TargetingSettings,
    pub delay_ms: u64,
    pub policy: DispatchPolicy,
}

impl Default for ColorTemperatureSettings {
    fn default() -> Self {
        Self {
            transition_secs: 0.5,
            targeting: TargetingSettings {
                groups: GroupPolicy::Any,
                ..TargetingSettings::default()
            },
            delay_ms: 0,
            policy: DispatchPolicy::Lenient,
        }
    }
}

pub struct ColorTemperatureService<'a, H> {
    hub: &'a H,
    settings: ColorTemperatureSettings,
}

impl<'a, H> ColorTemperatureService<'a, H>
where
    H: DeviceRepository + ZoneRepository + DeviceControl + Sync,
{
    pub fn new(hub: &'a H, settings: ColorTemperatureSettings) -> Self {
        Self { hub, settings }
    }

    /// # Errors
    ///
    /// Returns [`ZoneHubError::Argument`] for a missing or non-numeric
    /// argument, a repository error, or under [`DispatchPolicy::Strict`] the
    /// first device failure.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, argument: Option<&str>) -> Result<DispatchReport, ZoneHubError> {
        let argument = LevelArgument::parse(argument)?;
        let snapshot = HubSnapshot::load(self.hub).await?;

        let filter = snapshot
            .filter(&argument.zones, &self.settings.targeting)
            .class(LIGHT_CLASS)
            .require(Capability::LIGHT_TEMPERATURE);
        let selected = snapshot.select(&filter);

        CommandDispatcher::new(self.hub)
            .with_delay(Duration::from_millis(self.settings.delay_ms))
            .with_policy(self.settings.policy)
            .dispatch(
                &selected.targets,
                level_commands(
                    argument.level,
                    CommandKind::Temperature,
                    transition_from_secs(self.settings.transition_secs),
                ),
            )
            .await
    }
}
