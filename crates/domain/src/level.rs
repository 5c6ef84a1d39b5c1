//! Level resolution — turns a percentage token into a per-device target.
//!
//! A bare integer (`"80"`) is an absolute level; a signed one (`"+20"`,
//! `"-20"`) is a delta applied to the device's current value. The token is
//! divided by 100 and clamped to `[-1, 1]`. Since absolute tokens carry no
//! sign they always land in `[0, 1]`.

use serde::{Deserialize, Serialize};

use crate::argument::{ScriptArgument, leading_integer};
use crate::device::{Capability, Device};
use crate::error::ArgumentError;

/// Whether a level replaces or offsets the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelMode {
    Absolute,
    Relative,
}

/// A parsed, normalized level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub mode: LevelMode,
    /// `[0, 1]` in absolute mode, `[-1, 1]` in relative mode.
    pub normalized: f64,
}

impl Level {
    /// Parse a percentage token.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::NotANumber`] when the token does not start
    /// with an integer.
    pub fn parse(token: &str) -> Result<Self, ArgumentError> {
        let percent = leading_integer(token).ok_or_else(|| ArgumentError::NotANumber {
            token: token.to_string(),
        })?;
        let mode = if token.trim_start().starts_with(['+', '-']) {
            LevelMode::Relative
        } else {
            LevelMode::Absolute
        };
        #[allow(clippy::cast_precision_loss)]
        let normalized = (percent as f64 / 100.0).clamp(-1.0, 1.0);
        Ok(Self { mode, normalized })
    }

    /// Target value of `capability` on `device`.
    ///
    /// Absolute levels never read device state. Relative levels need a
    /// current numeric value and return `None` when it is unknown.
    #[must_use]
    pub fn target(&self, device: &Device, capability: &Capability) -> Option<f64> {
        match self.mode {
            LevelMode::Absolute => Some(capability.clamp(self.normalized)),
            LevelMode::Relative => device
                .number(capability)
                .map(|current| capability.clamp(current + self.normalized)),
        }
    }
}

/// A `level|zone|zone…` script argument.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelArgument {
    pub level: Level,
    pub zones: Vec<String>,
}

impl LevelArgument {
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] without an argument and
    /// [`ArgumentError::NotANumber`] when the level token is not numeric.
    pub fn parse(raw: Option<&str>) -> Result<Self, ArgumentError> {
        let ScriptArgument { primary, zones } = ScriptArgument::parse(raw)?;
        Ok(Self {
            level: Level::parse(&primary)?,
            zones,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(dim: Option<f64>) -> Device {
        let builder = Device::builder().id("lamp").name("Lamp").zone("z");
        match dim {
            Some(value) => builder.value(Capability::DIM, value),
            None => builder.capability(Capability::DIM),
        }
        .build()
        .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn should_parse_bare_integer_as_absolute() {
        let level = Level::parse("80").unwrap();
        assert_eq!(level.mode, LevelMode::Absolute);
        assert!(close(level.normalized, 0.8));
    }

    #[test]
    fn should_parse_signed_integer_as_relative() {
        let level = Level::parse("+20").unwrap();
        assert_eq!(level.mode, LevelMode::Relative);
        assert!(close(level.normalized, 0.2));
    }

    #[test]
    fn should_clamp_large_negative_delta() {
        let level = Level::parse("-150").unwrap();
        assert_eq!(level.mode, LevelMode::Relative);
        assert!(close(level.normalized, -1.0));
    }

    #[test]
    fn should_treat_signed_token_with_leading_whitespace_as_relative() {
        let level = Level::parse(" -20").unwrap();
        assert_eq!(level.mode, LevelMode::Relative);
        assert!(close(level.normalized, -0.2));
    }

    #[test]
    fn should_clamp_absolute_above_one_hundred() {
        let level = Level::parse("250").unwrap();
        assert!(close(level.normalized, 1.0));
    }

    #[test]
    fn should_fail_when_token_is_not_a_number() {
        assert_eq!(
            Level::parse("abc"),
            Err(ArgumentError::NotANumber {
                token: "abc".to_string()
            })
        );
    }

    #[test]
    fn should_accept_zero() {
        let level = Level::parse("0").unwrap();
        assert_eq!(level.mode, LevelMode::Absolute);
        assert!(close(level.normalized, 0.0));
    }

    #[test]
    fn should_parse_full_argument_with_zones() {
        let arg = LevelArgument::parse(Some("-20|Kitchen|Hallway")).unwrap();
        assert_eq!(arg.level.mode, LevelMode::Relative);
        assert_eq!(arg.zones, vec!["Kitchen", "Hallway"]);
    }

    #[test]
    fn should_fail_with_missing_before_parsing_level() {
        assert_eq!(LevelArgument::parse(None), Err(ArgumentError::Missing));
    }

    #[test]
    fn should_ignore_current_state_when_absolute() {
        let level = Level::parse("35").unwrap();
        for prior in [None, Some(0.0), Some(0.6), Some(1.0)] {
            let target = level.target(&lamp(prior), &Capability::DIM).unwrap();
            assert!(close(target, 0.35));
        }
    }

    #[test]
    fn should_restore_value_when_relative_deltas_cancel_out() {
        let up = Level::parse("+20").unwrap();
        let down = Level::parse("-20").unwrap();
        for start in [0.2, 0.45, 0.8] {
            let raised = up.target(&lamp(Some(start)), &Capability::DIM).unwrap();
            let restored = down.target(&lamp(Some(raised)), &Capability::DIM).unwrap();
            assert!(close(restored, start));
        }
    }

    #[test]
    fn should_clamp_relative_result_into_capability_range() {
        let up = Level::parse("+50").unwrap();
        let target = up.target(&lamp(Some(0.9)), &Capability::DIM).unwrap();
        assert!(close(target, 1.0));
        let down = Level::parse("-50").unwrap();
        let target = down.target(&lamp(Some(0.1)), &Capability::DIM).unwrap();
        assert!(close(target, 0.0));
    }

    #[test]
    fn should_skip_relative_target_when_current_value_unknown() {
        let level = Level::parse("+10").unwrap();
        assert_eq!(level.target(&lamp(None), &Capability::DIM), None);
    }
}
