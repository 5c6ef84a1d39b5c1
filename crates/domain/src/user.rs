//! Users and household presence.

use serde::{Deserialize, Serialize};

use crate::argument::leading_integer;
use crate::id::UserId;

fn enabled_by_default() -> bool {
    true
}

/// A hub user with presence and sleep state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub present: bool,
    #[serde(default)]
    pub asleep: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// Counts of users at home.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presence {
    pub asleep: usize,
    pub awake: usize,
}

impl Presence {
    /// Count present users; disabled ones only when `include_disabled`.
    #[must_use]
    pub fn count<'a>(users: impl IntoIterator<Item = &'a User>, include_disabled: bool) -> Self {
        users
            .into_iter()
            .filter(|user| user.present && (include_disabled || user.enabled))
            .fold(Self::default(), |mut acc, user| {
                if user.asleep {
                    acc.asleep += 1;
                } else {
                    acc.awake += 1;
                }
                acc
            })
    }

    /// Whether everybody at home sleeps, or `min_sleepers > 0` and
    /// `min_sleepers >= asleep`.
    #[must_use]
    pub fn all_sleeping(&self, min_sleepers: usize) -> bool {
        (self.awake == 0 && self.asleep > 0) || (min_sleepers > 0 && min_sleepers >= self.asleep)
    }
}

/// Minimum sleeper count from an optional argument; anything that is not a
/// positive integer counts as zero.
#[must_use]
pub fn min_sleepers(raw: Option<&str>) -> usize {
    raw.and_then(leading_integer)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}
