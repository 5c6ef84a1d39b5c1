//! Clock service — the hub's local time as `HH:MM`.

use chrono_tz::Tz;
use zonehub_domain::error::{ValidationError, ZoneHubError};
use zonehub_domain::time::Timestamp;

use crate::ports::SystemInfoProvider;

pub struct ClockService<'a, S> {
    system: &'a S,
}

impl<'a, S: SystemInfoProvider + Sync> ClockService<'a, S> {
    pub fn new(system: &'a S) -> Self {
        Self { system }
    }

    /// Format `now` in the hub's time zone.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownTimeZone`] when the hub reports a
    /// time zone that is not an IANA name.
    #[tracing::instrument(skip(self, now))]
    pub async fn local_time(&self, now: Timestamp) -> Result<String, ZoneHubError> {
        let info = self.system.system_info().await?;
        let tz: Tz = info
            .timezone
            .parse()
            .map_err(|_| ValidationError::UnknownTimeZone(info.timezone.clone()))?;
        Ok(now.with_timezone(&tz).format("%H:%M").to_string())
    }
}
