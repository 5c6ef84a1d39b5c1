//! Random colour service — gives each light a random palette colour, then
//! leaves it alone for a random cooldown.
//!
//! Meant to be triggered every second or so. Argument (optional): `zone|zone…`.

use std::time::Duration;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use zonehub_domain::argument::ScriptArgument;
use zonehub_domain::color::HexColor;
use zonehub_domain::command::Command;
use zonehub_domain::cooldown::CooldownInterval;
use zonehub_domain::device::{Capability, LIGHT_CLASS};
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::time::Timestamp;

use super::transition_from_secs;
use crate::cooldown::CooldownStore;
use crate::dispatcher::{CommandDispatcher, DispatchPolicy, DispatchReport};
use crate::ports::{DeviceControl, DeviceRepository, KeyValueStore, ZoneRepository};
use crate::targeting::{HubSnapshot, TargetingSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomColorSettings {
    /// Shortest cooldown between two changes of one light, in seconds.
    pub interval_min: u64,
    /// Longest cooldown (exclusive), in seconds.
    pub interval_max: u64,
    pub transition_secs: f64,
    #[serde(flatten)]
    pub targeting: TargetingSettings,
    pub delay_ms: u64,
    pub policy: DispatchPolicy,
    pub palette: Vec<HexColor>,
    /// Key the cooldown table is stored under.
    pub store_key: String,
}

impl Default for RandomColorSettings {
    fn default() -> Self {
        Self {
            interval_min: 10,
            interval_max: 30,
            transition_secs: 2.0,
            targeting: TargetingSettings::default(),
            delay_ms: 0,
            policy: DispatchPolicy::Lenient,
            palette: HexColor::default_palette(),
            store_key: "random-color".to_string(),
        }
    }
}

pub struct RandomColorService<'a, H, K> {
    hub: &'a H,
    store: &'a K,
    settings: RandomColorSettings,
}

impl<'a, H, K> RandomColorService<'a, H, K>
where
    H: DeviceRepository + ZoneRepository + DeviceControl + Sync,
    K: KeyValueStore + Sync,
{
    pub fn new(hub: &'a H, store: &'a K, settings: RandomColorSettings) -> Self {
        Self {
            hub,
            store,
            settings,
        }
    }

    /// Recolour every eligible light at `now`.
    ///
    /// The cooldown table is saved even when a strict dispatch aborts, so
    /// lights already recoloured keep their cooldown.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneHubError::Validation`] for an inverted interval, a
    /// repository or store error, or under [`DispatchPolicy::Strict`] the
    /// first device failure.
    #[tracing::instrument(skip(self, now))]
    pub async fn run(
        &self,
        argument: Option<&str>,
        now: Timestamp,
    ) -> Result<DispatchReport, ZoneHubError> {
        let interval =
            CooldownInterval::new(self.settings.interval_min, self.settings.interval_max)?;
        let zones = ScriptArgument::zones_only(argument);
        if self.settings.palette.is_empty() {
            tracing::warn!("palette is empty, nothing to do");
            return Ok(DispatchReport::default());
        }

        let snapshot = HubSnapshot::load(self.hub).await?;
        let filter = snapshot
            .filter(&zones, &self.settings.targeting)
            .class(LIGHT_CLASS)
            .require(Capability::LIGHT_HUE)
            .require(Capability::LIGHT_SATURATION);
        let selected = snapshot.select(&filter);

        let mut cooldowns = CooldownStore::load(self.store, self.settings.store_key.as_str()).await?;
        let transition = transition_from_secs(self.settings.transition_secs);
        let palette = &self.settings.palette;

        let result = CommandDispatcher::new(self.hub)
            .with_delay(Duration::from_millis(self.settings.delay_ms))
            .with_policy(self.settings.policy)
            .dispatch(&selected.targets, |device| {
                if !cooldowns.is_eligible(&device.id, now) {
                    return None;
                }
                let color = *palette.choose(&mut rand::thread_rng())?;
                let delay = cooldowns.schedule(device.id.clone(), now, interval);
                tracing::debug!(device = %device.name, %color, ?delay, "picked colour");
                Some(Command::color(color).with_transition(transition))
            })
            .await;

        cooldowns.save().await?;
        result
    }
}
