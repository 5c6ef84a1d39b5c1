//! Hub system information.

use serde::{Deserialize, Serialize};

/// Locale and time zone the hub is configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Locale tag such as `sv-SE`.
    #[serde(default)]
    pub country: String,
    /// IANA time zone name such as `Europe/Stockholm`.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            country: String::new(),
            timezone: default_timezone(),
        }
    }
}
