//! Command dispatcher — sends one command per device, strictly in order.
//!
//! Each call is awaited before the next device is touched, and the
//! configured delay is slept between consecutive commands. Nothing is rolled
//! back: devices already commanded stay changed when a later one fails.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use zonehub_domain::command::{Command, CommandValue};
use zonehub_domain::device::{CapabilityValue, Device};
use zonehub_domain::error::{DeviceCommandError, ZoneHubError};
use zonehub_domain::id::DeviceId;

use crate::ports::DeviceControl;

/// What happens when a single device rejects its command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Log the failure and continue with the next device.
    #[default]
    Lenient,
    /// Abort; later devices are not touched.
    Strict,
}

/// A command that the hub accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedCommand {
    pub device_id: DeviceId,
    pub command: Command,
}

/// Outcome of one dispatch run.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub issued: Vec<IssuedCommand>,
    /// Failures swallowed under [`DispatchPolicy::Lenient`].
    pub failed: Vec<DeviceCommandError>,
    /// Devices for which no command could be computed.
    pub skipped: Vec<DeviceId>,
}

impl DispatchReport {
    /// Numeric values of the issued commands, in dispatch order.
    #[must_use]
    pub fn issued_values(&self) -> Vec<f64> {
        self.issued
            .iter()
            .filter_map(|issued| issued.command.value.as_f64())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty() && self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Sends commands through a [`DeviceControl`] port.
pub struct CommandDispatcher<'a, C> {
    control: &'a C,
    delay: Duration,
    policy: DispatchPolicy,
}

impl<'a, C: DeviceControl + Sync> CommandDispatcher<'a, C> {
    #[must_use]
    pub fn new(control: &'a C) -> Self {
        Self {
            control,
            delay: Duration::ZERO,
            policy: DispatchPolicy::default(),
        }
    }

    /// Pause between two consecutive commands.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Send `command_for(device)` to every device in `devices`.
    ///
    /// Devices for which `command_for` returns `None` are skipped without
    /// a delay.
    ///
    /// # Errors
    ///
    /// Under [`DispatchPolicy::Strict`], returns
    /// [`ZoneHubError::DeviceCommand`] for the first failing device.
    pub async fn dispatch<F>(
        &self,
        devices: &[Device],
        mut command_for: F,
    ) -> Result<DispatchReport, ZoneHubError>
    where
        F: FnMut(&Device) -> Option<Command>,
    {
        let mut report = DispatchReport::default();
        let mut first = true;
        for device in devices {
            let Some(command) = command_for(device) else {
                report.skipped.push(device.id.clone());
                continue;
            };
            if !first && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            first = false;

            match self.send(&device.id, &command).await {
                Ok(()) => {
                    tracing::info!(device = %device.name, action = command.kind.action(), value = ?command.value, "command issued");
                    report.issued.push(IssuedCommand {
                        device_id: device.id.clone(),
                        command,
                    });
                }
                Err(err) => {
                    let err = DeviceCommandError::new(device.id.clone(), err);
                    match self.policy {
                        DispatchPolicy::Strict => return Err(err.into()),
                        DispatchPolicy::Lenient => {
                            tracing::warn!(device = %device.name, error = ?err.source, "command failed, continuing");
                            report.failed.push(err);
                        }
                    }
                }
            }
        }
        Ok(report)
    }

    async fn send(&self, device_id: &DeviceId, command: &Command) -> Result<(), ZoneHubError> {
        let plain = match &command.value {
            CommandValue::Number(n) if command.transition.is_none() => {
                Some(CapabilityValue::Number(*n))
            }
            CommandValue::Bool(b) if command.transition.is_none() => Some(CapabilityValue::Bool(*b)),
            _ => None,
        };
        match plain {
            Some(value) => {
                self.control
                    .set_capability_value(device_id, &command.kind.capability(), value)
                    .await
            }
            None => self.control.run_action(device_id, command).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHub, Sent};
    use zonehub_domain::device::Capability;

    fn lamp(id: &str) -> Device {
        Device::builder()
            .id(id)
            .name(format!("Lamp {id}"))
            .zone("z")
            .value(Capability::DIM, 0.5)
            .build()
            .unwrap()
    }

    fn lamps() -> Vec<Device> {
        vec![lamp("a"), lamp("b"), lamp("c")]
    }

    fn sent_ids(hub: &FakeHub) -> Vec<String> {
        hub.sent()
            .iter()
            .map(|s| s.device_id().to_string())
            .collect()
    }

    #[tokio::test]
    async fn should_send_commands_in_device_order() {
        let hub = FakeHub::default();
        let report = CommandDispatcher::new(&hub)
            .dispatch(&lamps(), |_| Some(Command::dim(0.3)))
            .await
            .unwrap();
        assert_eq!(sent_ids(&hub), vec!["a", "b", "c"]);
        assert_eq!(report.issued_values(), vec![0.3, 0.3, 0.3]);
    }

    #[tokio::test]
    async fn should_write_plain_value_without_transition() {
        let hub = FakeHub::default();
        CommandDispatcher::new(&hub)
            .dispatch(&[lamp("a")], |_| Some(Command::on_off(true)))
            .await
            .unwrap();
        assert_eq!(
            hub.sent(),
            vec![Sent::Value {
                device_id: DeviceId::from("a"),
                capability: Capability::ONOFF,
                value: CapabilityValue::Bool(true),
            }]
        );
    }

    #[tokio::test]
    async fn should_run_action_when_transition_given() {
        let hub = FakeHub::default();
        let command = Command::dim(0.7).with_transition(Duration::from_millis(500));
        CommandDispatcher::new(&hub)
            .dispatch(&[lamp("a")], |_| Some(command.clone()))
            .await
            .unwrap();
        assert!(matches!(&hub.sent()[0], Sent::Action { command: c, .. } if *c == command));
    }

    #[tokio::test]
    async fn should_continue_after_failure_when_lenient() {
        let hub = FakeHub::default().failing("b");
        let report = CommandDispatcher::new(&hub)
            .dispatch(&lamps(), |_| Some(Command::dim(0.3)))
            .await
            .unwrap();
        assert_eq!(sent_ids(&hub), vec!["a", "c"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].device_id.as_str(), "b");
        assert_eq!(report.issued.len(), 2);
    }

    #[tokio::test]
    async fn should_stop_at_first_failure_when_strict() {
        let hub = FakeHub::default().failing("b");
        let result = CommandDispatcher::new(&hub)
            .with_policy(DispatchPolicy::Strict)
            .dispatch(&lamps(), |_| Some(Command::dim(0.3)))
            .await;
        match result {
            Err(ZoneHubError::DeviceCommand(err)) => assert_eq!(err.device_id.as_str(), "b"),
            other => panic!("expected device command error, got {other:?}"),
        }
        assert_eq!(sent_ids(&hub), vec!["a"]);
    }

    #[tokio::test]
    async fn should_record_devices_without_command_as_skipped() {
        let hub = FakeHub::default();
        let report = CommandDispatcher::new(&hub)
            .dispatch(&lamps(), |d| (d.id.as_str() != "b").then(|| Command::dim(0.1)))
            .await
            .unwrap();
        assert_eq!(report.skipped, vec![DeviceId::from("b")]);
        assert_eq!(sent_ids(&hub), vec!["a", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_sleep_only_between_devices() {
        let hub = FakeHub::default();
        let start = tokio::time::Instant::now();
        CommandDispatcher::new(&hub)
            .with_delay(Duration::from_millis(200))
            .dispatch(&lamps(), |_| Some(Command::dim(0.3)))
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn should_return_empty_report_for_no_devices() {
        let hub = FakeHub::default();
        let report = CommandDispatcher::new(&hub)
            .dispatch(&[], |_| Some(Command::dim(0.3)))
            .await
            .unwrap();
        assert!(report.is_empty());
    }
}
