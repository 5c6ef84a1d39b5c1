//! Device — a controllable or sensing endpoint that belongs to one zone.

mod capability;
mod value;

pub use capability::Capability;
pub use value::{CapabilityState, CapabilityValue};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ZoneHubError};
use crate::id::{DeviceId, ZoneId};
use crate::time::Timestamp;

/// Driver id fragment the hub uses for device-group proxies.
pub const GROUP_DRIVER_MARKER: &str = "virtualdrivergroup";

/// Device class used by every lighting service.
pub const LIGHT_CLASS: &str = "light";

fn available_by_default() -> bool {
    true
}

/// A device known to the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub zone: ZoneId,
    #[serde(default)]
    pub class: Option<String>,
    /// Class chosen by the user for devices such as sockets driving a lamp.
    #[serde(default)]
    pub virtual_class: Option<String>,
    #[serde(default)]
    pub capabilities: BTreeSet<Capability>,
    #[serde(default)]
    pub capability_values: BTreeMap<Capability, CapabilityState>,
    /// Set when the hub reports this device as a member of a device group.
    #[serde(default)]
    pub group: bool,
    #[serde(default)]
    pub driver_id: String,
    /// URI of the app owning the device, e.g. `homey:app:com.example`.
    #[serde(default)]
    pub owner_uri: String,
    #[serde(default = "available_by_default")]
    pub available: bool,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneHubError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), ZoneHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Whether `class` or `virtual_class` equals `class`.
    #[must_use]
    pub fn is_class(&self, class: &str) -> bool {
        self.class.as_deref() == Some(class) || self.virtual_class.as_deref() == Some(class)
    }

    /// The effective class: the virtual class when set, otherwise the class.
    #[must_use]
    pub fn effective_class(&self) -> Option<&str> {
        self.virtual_class.as_deref().or(self.class.as_deref())
    }

    #[must_use]
    pub fn has_capability(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Whether every capability in `required` is supported.
    #[must_use]
    pub fn has_capabilities(&self, required: &[Capability]) -> bool {
        required.iter().all(|cap| self.has_capability(cap))
    }

    #[must_use]
    pub fn value(&self, capability: &Capability) -> Option<&CapabilityValue> {
        self.capability_values
            .get(capability)
            .and_then(|state| state.value.as_ref())
    }

    /// Current numeric value of `capability`, if known.
    #[must_use]
    pub fn number(&self, capability: &Capability) -> Option<f64> {
        self.value(capability).and_then(CapabilityValue::as_f64)
    }

    /// Current boolean value of `capability`, if known.
    #[must_use]
    pub fn flag(&self, capability: &Capability) -> Option<bool> {
        self.value(capability).and_then(CapabilityValue::as_bool)
    }

    /// Most recent `last_updated` across all capabilities.
    #[must_use]
    pub fn last_reported(&self) -> Option<Timestamp> {
        self.capability_values
            .values()
            .filter_map(|state| state.last_updated)
            .max()
    }

    /// Whether this device is a group proxy rather than a physical device.
    #[must_use]
    pub fn is_group_proxy(&self) -> bool {
        self.driver_id.contains(GROUP_DRIVER_MARKER)
    }

    /// Whether the only capability reported is the battery level.
    #[must_use]
    pub fn reports_battery_only(&self) -> bool {
        self.capabilities.len() == 1 && self.has_capability(&Capability::MEASURE_BATTERY)
    }

    /// Record a new value for `capability` observed at `at`.
    pub fn set_value(&mut self, capability: &Capability, value: CapabilityValue, at: Timestamp) {
        let state = self.capability_values.entry(capability.clone()).or_default();
        state.value = Some(value);
        state.last_updated = Some(at);
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    zone: Option<ZoneId>,
    class: Option<String>,
    virtual_class: Option<String>,
    capabilities: BTreeSet<Capability>,
    capability_values: BTreeMap<Capability, CapabilityState>,
    group: bool,
    driver_id: Option<String>,
    owner_uri: Option<String>,
    available: Option<bool>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn zone(mut self, zone: impl Into<ZoneId>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    #[must_use]
    pub fn virtual_class(mut self, class: impl Into<String>) -> Self {
        self.virtual_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Add `capability` with a current value and no report timestamp.
    #[must_use]
    pub fn value(mut self, capability: Capability, value: impl Into<CapabilityValue>) -> Self {
        self.capability_values.insert(
            capability.clone(),
            CapabilityState {
                value: Some(value.into()),
                ..CapabilityState::default()
            },
        );
        self.capabilities.insert(capability);
        self
    }

    /// Add `capability` with a value last reported at `at`.
    #[must_use]
    pub fn reported(
        mut self,
        capability: Capability,
        value: impl Into<CapabilityValue>,
        at: Timestamp,
    ) -> Self {
        self.capability_values.insert(
            capability.clone(),
            CapabilityState {
                value: Some(value.into()),
                last_updated: Some(at),
                title: None,
            },
        );
        self.capabilities.insert(capability);
        self
    }

    #[must_use]
    pub fn group(mut self, group: bool) -> Self {
        self.group = group;
        self
    }

    #[must_use]
    pub fn driver_id(mut self, driver_id: impl Into<String>) -> Self {
        self.driver_id = Some(driver_id.into());
        self
    }

    #[must_use]
    pub fn owner_uri(mut self, owner_uri: impl Into<String>) -> Self {
        self.owner_uri = Some(owner_uri.into());
        self
    }

    #[must_use]
    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`ZoneHubError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Device, ZoneHubError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            zone: self.zone.unwrap_or_default(),
            class: self.class,
            virtual_class: self.virtual_class,
            capabilities: self.capabilities,
            capability_values: self.capability_values,
            group: self.group,
            driver_id: self.driver_id.unwrap_or_default(),
            owner_uri: self.owner_uri.unwrap_or_default(),
            available: self.available.unwrap_or(true),
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::from_millis;

    fn dimmable_light() -> Device {
        Device::builder()
            .id("lamp")
            .name("Ceiling")
            .zone("kitchen")
            .class("light")
            .value(Capability::ONOFF, true)
            .value(Capability::DIM, 0.4)
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_device_when_name_provided() {
        let device = dimmable_light();
        assert_eq!(device.name, "Ceiling");
        assert!(device.available);
        assert_eq!(device.capabilities.len(), 2);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Device::builder().zone("z").build();
        assert!(matches!(
            result,
            Err(ZoneHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_match_class_or_virtual_class() {
        let socket = Device::builder()
            .name("Socket")
            .class("socket")
            .virtual_class("light")
            .build()
            .unwrap();
        assert!(socket.is_class("light"));
        assert!(socket.is_class("socket"));
        assert_eq!(socket.effective_class(), Some("light"));
    }

    #[test]
    fn should_read_typed_values() {
        let device = dimmable_light();
        assert_eq!(device.number(&Capability::DIM), Some(0.4));
        assert_eq!(device.flag(&Capability::ONOFF), Some(true));
        assert_eq!(device.number(&Capability::LIGHT_TEMPERATURE), None);
    }

    #[test]
    fn should_require_every_capability() {
        let device = dimmable_light();
        assert!(device.has_capabilities(&[Capability::DIM, Capability::ONOFF]));
        assert!(!device.has_capabilities(&[Capability::DIM, Capability::LIGHT_HUE]));
    }

    #[test]
    fn should_report_latest_capability_update() {
        let device = Device::builder()
            .name("Sensor")
            .reported(Capability::MEASURE_BATTERY, 80.0, from_millis(1_000))
            .reported(Capability::new("measure_temperature"), 21.5, from_millis(5_000))
            .build()
            .unwrap();
        assert_eq!(device.last_reported(), Some(from_millis(5_000)));
        assert!(!device.reports_battery_only());
    }

    #[test]
    fn should_detect_group_proxy_by_driver_id() {
        let proxy = Device::builder()
            .name("All lights")
            .driver_id("homey:app:net.i-dev.betterlogic:virtualdrivergroup")
            .build()
            .unwrap();
        assert!(proxy.is_group_proxy());
        assert!(!dimmable_light().is_group_proxy());
    }

    #[test]
    fn should_update_value_and_timestamp() {
        let mut device = dimmable_light();
        device.set_value(&Capability::DIM, 0.9.into(), from_millis(42));
        assert_eq!(device.number(&Capability::DIM), Some(0.9));
        assert_eq!(device.last_reported(), Some(from_millis(42)));
    }

    #[test]
    fn should_default_available_when_missing_from_json() {
        let json = r#"{"id": "d1", "name": "Lamp", "zone": "z1"}"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert!(device.available);
        assert!(device.capabilities.is_empty());
    }
}
