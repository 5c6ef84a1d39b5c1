//! Light status service — is any light on?

use zonehub_domain::device::{Capability, LIGHT_CLASS};
use zonehub_domain::error::ZoneHubError;

use crate::ports::DeviceRepository;

pub struct LightStatusService<'a, R> {
    repo: &'a R,
}

impl<'a, R: DeviceRepository + Sync> LightStatusService<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Whether any device whose effective class contains `light` reports
    /// `onoff = true`.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    #[tracing::instrument(skip(self))]
    pub async fn any_light_on(&self) -> Result<bool, ZoneHubError> {
        let devices = self.repo.get_all_devices().await?;
        let on: Vec<&str> = devices
            .iter()
            .filter(|device| {
                device
                    .effective_class()
                    .is_some_and(|class| class.contains(LIGHT_CLASS))
            })
            .filter(|device| device.flag(&Capability::ONOFF) == Some(true))
            .map(|device| device.name.as_str())
            .collect();
        tracing::info!(lights_on = ?on, "checked lights");
        Ok(!on.is_empty())
    }
}
