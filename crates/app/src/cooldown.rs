//! Cooldown store — the persisted per-device cooldown table.
//!
//! Loaded once at the start of a run and saved once at the end, under a key
//! that identifies the owning service.

use std::time::Duration;

use rand::Rng;
use zonehub_domain::cooldown::{CooldownInterval, CooldownTable};
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::id::DeviceId;
use zonehub_domain::time::Timestamp;

use crate::ports::KeyValueStore;

pub struct CooldownStore<'a, K> {
    store: &'a K,
    key: String,
    table: CooldownTable,
}

impl<'a, K: KeyValueStore + Sync> CooldownStore<'a, K> {
    /// Read the table stored under `key`.
    ///
    /// A missing entry starts an empty table. So does an entry that does not
    /// decode, after a warning; it is overwritten by the next save.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub async fn load(store: &'a K, key: impl Into<String>) -> Result<Self, ZoneHubError> {
        let key = key.into();
        let table = match store.get(&key).await? {
            None => CooldownTable::new(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                tracing::warn!(%key, error = %err, "discarding unreadable cooldown table");
                CooldownTable::new()
            }),
        };
        tracing::debug!(%key, entries = table.len(), "loaded cooldown table");
        Ok(Self { store, key, table })
    }

    #[must_use]
    pub fn is_eligible(&self, device_id: &DeviceId, now: Timestamp) -> bool {
        self.table.is_eligible(device_id, now)
    }

    /// Draw a delay in `[min, max)` whole seconds and store `now + delay`.
    /// Returns the drawn delay.
    pub fn schedule(
        &mut self,
        device_id: DeviceId,
        now: Timestamp,
        interval: CooldownInterval,
    ) -> Duration {
        self.schedule_with(&mut rand::thread_rng(), device_id, now, interval)
    }

    /// [`schedule`](Self::schedule) with an explicit random source.
    pub fn schedule_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        device_id: DeviceId,
        now: Timestamp,
        interval: CooldownInterval,
    ) -> Duration {
        let secs = if interval.is_fixed() {
            interval.min()
        } else {
            rng.gen_range(interval.min()..interval.max())
        };
        let delay = Duration::from_secs(secs);
        self.table.schedule(device_id, now, delay);
        delay
    }

    #[must_use]
    pub fn table(&self) -> &CooldownTable {
        &self.table
    }

    /// Write the table back under its key.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub async fn save(&self) -> Result<(), ZoneHubError> {
        let value =
            serde_json::to_value(&self.table).map_err(|err| ZoneHubError::Storage(Box::new(err)))?;
        self.store.set(&self.key, value).await
    }
}
