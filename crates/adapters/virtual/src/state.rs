//! Serializable state of a virtual home and how commands change it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zonehub_domain::command::{Command, CommandKind, CommandValue};
use zonehub_domain::device::{Capability, CapabilityValue, Device};
use zonehub_domain::flow::Flow;
use zonehub_domain::id::DeviceId;
use zonehub_domain::system::SystemInfo;
use zonehub_domain::time::Timestamp;
use zonehub_domain::user::User;
use zonehub_domain::zone::Zone;

use crate::error::VirtualError;

/// Everything the virtual hub knows, in snapshot form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeState {
    pub system: SystemInfo,
    pub zones: Vec<Zone>,
    pub devices: Vec<Device>,
    pub users: Vec<User>,
    pub flows: Vec<Flow>,
    pub tags: BTreeMap<String, String>,
    /// Key-value entries kept by services between runs.
    pub store: BTreeMap<String, serde_json::Value>,
}

impl HomeState {
    fn device_mut(&mut self, id: &DeviceId) -> Result<&mut Device, VirtualError> {
        let device = self
            .devices
            .iter_mut()
            .find(|device| &device.id == id)
            .ok_or_else(|| VirtualError::UnknownDevice(id.clone()))?;
        if !device.available {
            return Err(VirtualError::Unavailable(id.clone()));
        }
        Ok(device)
    }

    /// Write one capability value the device supports.
    ///
    /// # Errors
    ///
    /// Fails for unknown or unavailable devices and unsupported capabilities.
    pub fn write_value(
        &mut self,
        id: &DeviceId,
        capability: &Capability,
        value: CapabilityValue,
        at: Timestamp,
    ) -> Result<(), VirtualError> {
        let device = self.device_mut(id)?;
        if !device.has_capability(capability) {
            return Err(VirtualError::UnsupportedCapability {
                device_id: id.clone(),
                capability: capability.to_string(),
            });
        }
        device.set_value(capability, value, at);
        Ok(())
    }

    /// Apply an action card; transitions complete instantly.
    ///
    /// Dimming also switches the light, on for any positive level and off
    /// at zero.
    ///
    /// # Errors
    ///
    /// Fails for unknown or unavailable devices and unsupported capabilities.
    pub fn apply(
        &mut self,
        id: &DeviceId,
        command: &Command,
        at: Timestamp,
    ) -> Result<(), VirtualError> {
        match (&command.kind, &command.value) {
            (CommandKind::Color, CommandValue::Color(color)) => {
                let (hue, saturation) = color.hue_saturation();
                self.write_value(id, &Capability::LIGHT_HUE, hue.into(), at)?;
                self.write_value(id, &Capability::LIGHT_SATURATION, saturation.into(), at)
            }
            (CommandKind::Dim, CommandValue::Number(level)) => {
                self.write_value(id, &Capability::DIM, (*level).into(), at)?;
                let device = self.device_mut(id)?;
                if device.has_capability(&Capability::ONOFF) {
                    device.set_value(&Capability::ONOFF, (*level > 0.0).into(), at);
                }
                Ok(())
            }
            (kind, value) => {
                let value = match value {
                    CommandValue::Number(n) => CapabilityValue::Number(*n),
                    CommandValue::Bool(b) => CapabilityValue::Bool(*b),
                    CommandValue::Color(color) => CapabilityValue::Text(color.to_string()),
                };
                self.write_value(id, &kind.capability(), value, at)
            }
        }
    }
}
