//! Dim service — dims every light in the given zones.
//!
//! Argument: `level|zone|zone…`, e.g. `80|Kitchen` (absolute) or
//! `-20|Kitchen|Hallway` (relative). Without zones every light is dimmed.
//! Lights that cannot dim follow the average issued level through an on/off
//! fallback when a threshold is configured.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use zonehub_domain::command::{Command, CommandKind};
use zonehub_domain::device::{Capability, LIGHT_CLASS};
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::fallback::{aggregate, threshold_from_percent};
use zonehub_domain::level::LevelArgument;

use super::level::level_commands;
use super::transition_from_secs;
use crate::dispatcher::{CommandDispatcher, DispatchPolicy, DispatchReport};
use crate::ports::{DeviceControl, DeviceRepository, ZoneRepository};
use crate::targeting::{HubSnapshot, TargetingSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimSettings {
    /// Transition to the new level, in seconds.
    pub transition_secs: f64,
    #[serde(flatten)]
    pub targeting: TargetingSettings,
    /// Average level (percent) at which non-dimmable lights turn on; `0`
    /// leaves them alone.
    pub fallback_threshold: u8,
    pub delay_ms: u64,
    pub policy: DispatchPolicy,
}

impl Default for DimSettings {
    fn default() -> Self {
        Self {
            transition_secs: 0.5,
            targeting: TargetingSettings::default(),
            fallback_threshold: 0,
            delay_ms: 0,
            policy: DispatchPolicy::Lenient,
        }
    }
}

/// What a dim run did.
#[derive(Debug, Default)]
pub struct DimOutcome {
    pub dimmed: DispatchReport,
    /// On/off state applied to non-dimmable lights, if any was.
    pub fallback_on: Option<bool>,
    pub fallback: DispatchReport,
}

pub struct DimZoneService<'a, H> {
    hub: &'a H,
    settings: DimSettings,
}

impl<'a, H> DimZoneService<'a, H>
where
    H: DeviceRepository + ZoneRepository + DeviceControl + Sync,
{
    pub fn new(hub: &'a H, settings: DimSettings) -> Self {
        Self { hub, settings }
    }

    /// Dim the lights selected by `argument`.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneHubError::Argument`] before touching the hub when the
    /// argument is missing or not numeric, a repository error, or under
    /// [`DispatchPolicy::Strict`] the first device failure.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, argument: Option<&str>) -> Result<DimOutcome, ZoneHubError> {
        let argument = LevelArgument::parse(argument)?;
        let snapshot = HubSnapshot::load(self.hub).await?;

        let mut filter = snapshot
            .filter(&argument.zones, &self.settings.targeting)
            .class(LIGHT_CLASS)
            .require(Capability::DIM);
        if self.settings.fallback_threshold > 0 {
            filter = filter.fallback(Capability::ONOFF);
        }
        let selected = snapshot.select(&filter);

        let delay = Duration::from_millis(self.settings.delay_ms);
        let dispatcher = CommandDispatcher::new(self.hub)
            .with_delay(delay)
            .with_policy(self.settings.policy);

        let transition = transition_from_secs(self.settings.transition_secs);
        let dimmed = dispatcher
            .dispatch(
                &selected.targets,
                level_commands(argument.level, CommandKind::Dim, transition),
            )
            .await?;

        let threshold = threshold_from_percent(self.settings.fallback_threshold);
        let fallback_on = if selected.fallback.is_empty() {
            None
        } else {
            aggregate(&dimmed.issued_values(), threshold)
        };

        let mut outcome = DimOutcome {
            dimmed,
            fallback_on,
            fallback: DispatchReport::default(),
        };
        if let Some(on) = fallback_on {
            tracing::info!(on, devices = selected.fallback.len(), "switching non-dimmable lights");
            if !delay.is_zero() && !outcome.dimmed.issued.is_empty() {
                tokio::time::sleep(delay).await;
            }
            outcome.fallback = dispatcher
                .dispatch(&selected.fallback, |_| Some(Command::on_off(on)))
                .await?;
        }
        Ok(outcome)
    }
}
