//! Device control port — the only way commands reach devices.

use std::future::Future;

use zonehub_domain::command::Command;
use zonehub_domain::device::{Capability, CapabilityValue};
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::id::DeviceId;

/// Issues state-changing calls to single devices.
///
/// Each call is awaited by the dispatcher before the next device is
/// touched, and either call may fail for one device without affecting
/// others.
pub trait DeviceControl {
    /// Write one capability value directly.
    fn set_capability_value(
        &self,
        device_id: &DeviceId,
        capability: &Capability,
        value: CapabilityValue,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send;

    /// Run the device action card for `command`
    /// (`homey:device:<id>:<action>`), honouring its transition.
    fn run_action(
        &self,
        device_id: &DeviceId,
        command: &Command,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send;
}
