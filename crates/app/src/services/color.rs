//! Colour service — sets one colour on every colour-capable light in zones.
//!
//! Argument: `#RRGGBB|zone|zone…`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use zonehub_domain::color::ColorArgument;
use zonehub_domain::command::Command;
use zonehub_domain::device::{Capability, LIGHT_CLASS};
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::filter::GroupPolicy;

use super::transition_from_secs;
use crate::dispatcher::{CommandDispatcher, DispatchPolicy, DispatchReport};
use crate::ports::{DeviceControl, DeviceRepository, ZoneRepository};
use crate::targeting::{HubSnapshot, TargetingSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub transition_secs: f64,
    #[serde(flatten)]
    pub targeting: TargetingSettings,
    pub delay_ms: u64,
    pub policy: DispatchPolicy,
}

impl Default for ColorSettings {
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

pub struct ColorZoneService<'a, H> {
    hub: &'a H,
    settings: ColorSettings,
}

impl<'a, H> ColorZoneService<'a, H>
where
    H: DeviceRepository + ZoneRepository + DeviceControl + Sync,
{
    pub fn new(hub: &'a H, settings: ColorSettings) -> Self {
        Self { hub, settings }
    }

    /// # Errors
    ///
    /// Returns [`ZoneHubError::Argument`] for a missing argument or a
    /// malformed colour, a repository error, or under
    /// [`DispatchPolicy::Strict`] the first device failure.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, argument: Option<&str>) -> Result<DispatchReport, ZoneHubError> {
        let argument = ColorArgument::parse(argument)?;
        let snapshot = HubSnapshot::load(self.hub).await?;

        let filter = snapshot
            .filter(&argument.zones, &self.settings.targeting)
            .class(LIGHT_CLASS)
            .require(Capability::LIGHT_HUE)
            .require(Capability::LIGHT_SATURATION);
        let selected = snapshot.select(&filter);

        let command = Command::color(argument.color)
            .with_transition(transition_from_secs(self.settings.transition_secs));
        CommandDispatcher::new(self.hub)
            .with_delay(Duration::from_millis(self.settings.delay_ms))
            .with_policy(self.settings.policy)
            .dispatch(&selected.targets, |_| Some(command.clone()))
            .await
    }
}
