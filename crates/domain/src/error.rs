//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`ZoneHubError`]
//! via `#[from]`. Adapter failures are boxed into [`ZoneHubError::Storage`].

use crate::id::DeviceId;

/// Top-level error shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum ZoneHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("invalid argument")]
    Argument(#[from] ArgumentError),

    #[error("device command failed")]
    DeviceCommand(#[from] DeviceCommandError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated while building a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("identifier must not be empty")]
    EmptyId,

    #[error("zone cannot be its own parent")]
    SelfParent,

    #[error("minimum interval {min}s exceeds maximum interval {max}s")]
    InvertedInterval { min: u64, max: u64 },

    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The free-form script argument could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// No argument was supplied where one is required.
    #[error("must be run with an argument")]
    Missing,

    /// The leading token does not start with an integer.
    #[error("not a number: {token:?}")]
    NotANumber { token: String },

    /// The leading token is not a `#RRGGBB` colour.
    #[error("not a colour: {token:?}")]
    InvalidColor { token: String },
}

/// A single device rejected or failed a command.
#[derive(Debug, thiserror::Error)]
#[error("command to device {device_id} failed")]
pub struct DeviceCommandError {
    pub device_id: DeviceId,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl DeviceCommandError {
    /// Wrap any error as the failure of a command to `device_id`.
    pub fn new(
        device_id: DeviceId,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            device_id,
            source: source.into(),
        }
    }
}
