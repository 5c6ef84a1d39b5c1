//! Virtual home error types.

use zonehub_domain::error::{DeviceCommandError, ZoneHubError};
use zonehub_domain::id::DeviceId;

#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    #[error("unknown device {0}")]
    UnknownDevice(DeviceId),

    #[error("device {0} is unavailable")]
    Unavailable(DeviceId),

    #[error("device {device_id} has no capability {capability}")]
    UnsupportedCapability {
        device_id: DeviceId,
        capability: String,
    },

    #[error("snapshot io error")]
    Io(#[from] std::io::Error),

    #[error("snapshot json error")]
    Json(#[from] serde_json::Error),
}

impl VirtualError {
    fn device_id(&self) -> Option<&DeviceId> {
        match self {
            Self::UnknownDevice(id)
            | Self::Unavailable(id)
            | Self::UnsupportedCapability { device_id: id, .. } => Some(id),
            Self::Io(_) | Self::Json(_) => None,
        }
    }
}

impl From<VirtualError> for ZoneHubError {
    fn from(err: VirtualError) -> Self {
        let device_id = err.device_id().cloned();
        match device_id {
            Some(device_id) => DeviceCommandError::new(device_id, err).into(),
            None => ZoneHubError::Storage(Box::new(err)),
        }
    }
}
