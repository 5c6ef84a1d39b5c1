//! Targeting — the shared zone → device selection pipeline.
//!
//! Every lighting service loads a fresh [`HubSnapshot`], turns the zone
//! names of its argument into a [`ZoneScope`] and runs a [`DeviceFilter`]
//! over the devices.

use serde::{Deserialize, Serialize};
use zonehub_domain::device::Device;
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::filter::{DeviceFilter, FilterOutcome, GroupPolicy};
use zonehub_domain::zone::{NameMatch, ZoneResolver, ZoneScope, ZoneTree};

use crate::ports::{DeviceRepository, ZoneRepository};

/// Targeting options shared by the lighting services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingSettings {
    /// Resolve zone names to whole subtrees instead of literal names.
    pub include_subzones: bool,
    pub name_match: NameMatch,
    pub groups: GroupPolicy,
    /// Device ids or names never targeted.
    pub ignore: Vec<String>,
}

impl Default for TargetingSettings {
    fn default() -> Self {
        Self {
            include_subzones: true,
            name_match: NameMatch::All,
            groups: GroupPolicy::Members,
            ignore: Vec::new(),
        }
    }
}

/// Zones and devices read at the start of one invocation.
#[derive(Debug, Clone)]
pub struct HubSnapshot {
    pub tree: ZoneTree,
    pub devices: Vec<Device>,
}

impl HubSnapshot {
    /// Read zones and devices from the hub.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn load<R>(repo: &R) -> Result<Self, ZoneHubError>
    where
        R: DeviceRepository + ZoneRepository,
    {
        let zones = repo.get_all_zones().await?;
        let devices = repo.get_all_devices().await?;
        tracing::debug!(zones = zones.len(), devices = devices.len(), "loaded hub snapshot");
        Ok(Self {
            tree: ZoneTree::new(zones),
            devices,
        })
    }

    /// Zone scope for `zones` under `settings`.
    ///
    /// Names that match no zone are logged and contribute nothing.
    #[must_use]
    pub fn scope(&self, zones: &[String], settings: &TargetingSettings) -> ZoneScope {
        for name in zones {
            if self.tree.named(name).next().is_none() {
                tracing::debug!(zone = %name, "zone name matches no zone");
            }
        }
        ZoneResolver::new(&self.tree)
            .with_name_match(settings.name_match)
            .scope(zones, settings.include_subzones)
    }

    /// Base filter for `zones`: scope, ignore list and group policy.
    ///
    /// Callers add class and capability predicates.
    #[must_use]
    pub fn filter(&self, zones: &[String], settings: &TargetingSettings) -> DeviceFilter {
        DeviceFilter::new()
            .scope(self.scope(zones, settings))
            .ignore(settings.ignore.iter().cloned())
            .groups(settings.groups)
    }

    /// Run `filter` over the snapshot's devices.
    #[must_use]
    pub fn select(&self, filter: &DeviceFilter) -> FilterOutcome {
        let outcome = filter.apply(&self.devices, &self.tree);
        tracing::debug!(
            targets = outcome.targets.len(),
            fallback = outcome.fallback.len(),
            "selected devices"
        );
        outcome
    }
}
