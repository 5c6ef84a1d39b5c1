//! Shared per-device level computation for dim and colour temperature.

use std::time::Duration;

use zonehub_domain::command::{Command, CommandKind, CommandValue};
use zonehub_domain::device::Device;
use zonehub_domain::level::Level;

/// Command factory for [`CommandDispatcher::dispatch`](crate::dispatcher::CommandDispatcher::dispatch).
///
/// Devices whose current value is needed but unknown get no command.
pub(crate) fn level_commands(
    level: Level,
    kind: CommandKind,
    transition: Duration,
) -> impl FnMut(&Device) -> Option<Command> {
    let capability = kind.capability();
    move |device| {
        let Some(value) = level.target(device, &capability) else {
            tracing::warn!(
                device = %device.name,
                %capability,
                "current value unknown, skipping relative change"
            );
            return None;
        };
        let command = Command {
            kind,
            value: CommandValue::Number(value),
            transition: None,
        };
        Some(command.with_transition(transition))
    }
}
