//! Activity origins — why the hub marked a zone as active.
//!
//! Origins are URIs of the form `homey:<kind>:<id>[:<detail>]`.

use std::str::FromStr;

use crate::id::{DeviceId, ZoneId};

/// A parsed zone activity origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityOrigin {
    /// A device capability (e.g. a motion sensor) activated the zone.
    Device {
        device_id: DeviceId,
        capability: String,
    },
    /// An active sub-zone propagated its activity.
    Zone { zone_id: ZoneId },
    /// Any other origin kind the hub may report.
    Other { kind: String, id: String },
}

/// The origin string is not a `homey:<kind>:<id>` URI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed activity origin {0:?}")]
pub struct MalformedOrigin(pub String);

impl FromStr for ActivityOrigin {
    type Err = MalformedOrigin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedOrigin(s.to_string());
        let rest = s
            .split_once("homey:")
            .map(|(_, rest)| rest)
            .ok_or_else(malformed)?;

        let mut parts = rest.splitn(3, ':');
        let kind = parts.next().filter(|k| !k.is_empty()).ok_or_else(malformed)?;
        let id = parts.next().filter(|i| !i.is_empty()).ok_or_else(malformed)?;
        let detail = parts.next().unwrap_or_default();

        Ok(match kind {
            "device" => Self::Device {
                device_id: DeviceId::from(id),
                capability: detail.trim_start_matches(':').to_string(),
            },
            "zone" => Self::Zone {
                zone_id: ZoneId::from(id),
            },
            other => Self::Other {
                kind: other.to_string(),
                id: id.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_device_origin_with_capability() {
        let origin: ActivityOrigin = "homey:device:abc-123:alarm_motion".parse().unwrap();
        assert_eq!(
            origin,
            ActivityOrigin::Device {
                device_id: DeviceId::from("abc-123"),
                capability: "alarm_motion".to_string(),
            }
        );
    }

    #[test]
    fn should_parse_zone_origin() {
        let origin: ActivityOrigin = "homey:zone:z9".parse().unwrap();
        assert_eq!(
            origin,
            ActivityOrigin::Zone {
                zone_id: ZoneId::from("z9")
            }
        );
    }

    #[test]
    fn should_keep_unknown_origin_kinds() {
        let origin: ActivityOrigin = "homey:app:com.example".parse().unwrap();
        assert!(matches!(origin, ActivityOrigin::Other { ref kind, .. } if kind == "app"));
    }

    #[test]
    fn should_reject_origin_without_prefix() {
        assert!("device:abc:onoff".parse::<ActivityOrigin>().is_err());
    }

    #[test]
    fn should_reject_origin_without_id() {
        assert!("homey:device".parse::<ActivityOrigin>().is_err());
    }
}
