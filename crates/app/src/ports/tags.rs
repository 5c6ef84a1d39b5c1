//! Tag port — named outputs consumed by downstream automations.

use std::future::Future;

use zonehub_domain::error::ZoneHubError;

pub trait TagWriter {
    /// Create or overwrite the tag `name`.
    fn write_tag(
        &self,
        name: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send;
}
