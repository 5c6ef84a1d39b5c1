//! Zone activity service — lists active zones and why they are active.

use std::collections::HashMap;

use zonehub_domain::device::{Capability, Device};
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::id::DeviceId;
use zonehub_domain::zone::{ActivityOrigin, ZoneTree};

use crate::ports::{DeviceRepository, ZoneRepository};

/// One reason a zone is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityReason {
    /// A device capability, e.g. `Hall sensor | Motion alarm`.
    Device { device: String, capability: String },
    /// An active sub-zone.
    Zone { zone: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneActivity {
    pub zone: String,
    pub reasons: Vec<ActivityReason>,
}

pub struct ZoneActivityService<'a, R> {
    repo: &'a R,
}

impl<'a, R: DeviceRepository + ZoneRepository + Sync> ZoneActivityService<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Active zones in discovery order with their resolved origins.
    ///
    /// Origins that are malformed or point at unknown devices/zones are
    /// logged and left out.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ZoneActivity>, ZoneHubError> {
        let tree = ZoneTree::new(self.repo.get_all_zones().await?);
        let devices: HashMap<DeviceId, Device> = self
            .repo
            .get_all_devices()
            .await?
            .into_iter()
            .map(|device| (device.id.clone(), device))
            .collect();

        let activity = tree
            .iter()
            .filter(|zone| zone.active)
            .map(|zone| {
                let reasons = zone
                    .active_origins
                    .iter()
                    .filter_map(|raw| resolve(raw, &tree, &devices))
                    .collect();
                ZoneActivity {
                    zone: zone.name.clone(),
                    reasons,
                }
            })
            .collect();
        Ok(activity)
    }
}

fn resolve(
    raw: &str,
    tree: &ZoneTree,
    devices: &HashMap<DeviceId, Device>,
) -> Option<ActivityReason> {
    let origin: ActivityOrigin = match raw.parse() {
        Ok(origin) => origin,
        Err(err) => {
            tracing::warn!(error = %err, "skipping activity origin");
            return None;
        }
    };
    match origin {
        ActivityOrigin::Device {
            device_id,
            capability,
        } => {
            let Some(device) = devices.get(&device_id) else {
                tracing::warn!(%device_id, "activity origin names unknown device");
                return None;
            };
            let Some(title) = device
                .capability_values
                .get(&Capability::new(capability.as_str()))
                .map(|state| state.title.clone().unwrap_or_else(|| capability.clone()))
            else {
                tracing::warn!(device = %device.name, %capability, "activity origin names unknown capability");
                return None;
            };
            Some(ActivityReason::Device {
                device: device.name.clone(),
                capability: title,
            })
        }
        ActivityOrigin::Zone { zone_id } => match tree.name_of(&zone_id) {
            Some(name) => Some(ActivityReason::Zone {
                zone: name.to_string(),
            }),
            None => {
                tracing::warn!(%zone_id, "activity origin names unknown zone");
                None
            }
        },
        ActivityOrigin::Other { kind, id } => {
            tracing::debug!(%kind, %id, "ignoring activity origin kind");
            None
        }
    }
}
