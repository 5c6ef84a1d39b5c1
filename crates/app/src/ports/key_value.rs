//! Key-value port — opaque JSON state that survives between invocations.

use std::future::Future;

use zonehub_domain::error::ZoneHubError;

/// Process-wide store keyed by service identity.
pub trait KeyValueStore {
    /// Value stored under `key`, if any.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, ZoneHubError>> + Send;

    /// Replace the value stored under `key`.
    fn set(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send;
}
