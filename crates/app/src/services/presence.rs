//! Presence service — is everybody at home asleep?
//!
//! Argument (optional): the number of sleepers that is enough. Without one
//! (or with `0`) every user at home must be asleep. Nobody home is never
//! "all sleeping".

use serde::{Deserialize, Serialize};
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::user::{Presence, min_sleepers};

use crate::ports::UserRepository;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceSettings {
    /// Count disabled users too.
    pub include_disabled: bool,
}

pub struct PresenceService<'a, R> {
    repo: &'a R,
    settings: PresenceSettings,
}

impl<'a, R: UserRepository + Sync> PresenceService<'a, R> {
    pub fn new(repo: &'a R, settings: PresenceSettings) -> Self {
        Self { repo, settings }
    }

    /// # Errors
    ///
    /// Propagates repository failures.
    #[tracing::instrument(skip(self))]
    pub async fn all_sleeping(&self, argument: Option<&str>) -> Result<bool, ZoneHubError> {
        let users = self.repo.get_all_users().await?;
        let presence = Presence::count(&users, self.settings.include_disabled);
        tracing::info!(awake = presence.awake, asleep = presence.asleep, "counted users at home");
        Ok(presence.all_sleeping(min_sleepers(argument)))
    }
}
