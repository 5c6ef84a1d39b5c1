//! `#RRGGBB` colours and their hue/saturation form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::argument::ScriptArgument;
use crate::error::ArgumentError;

/// Colours the random colour service picks from unless configured otherwise.
pub const DEFAULT_PALETTE: [&str; 9] = [
    "#FF0000", // red
    "#008000", // green
    "#0000FF", // blue
    "#FFFF00", // yellow
    "#FF00FF", // magenta
    "#8000FF", // violet
    "#FFA500", // orange
    "#FF0080", // hot pink
    "#00FF00", // lime
];

/// An RGB colour written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl HexColor {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Hue and saturation, both normalized to `[0, 1]` as the light
    /// capabilities expect.
    #[must_use]
    pub fn hue_saturation(&self) -> (f64, f64) {
        let r = f64::from(self.red) / 255.0;
        let g = f64::from(self.green) / 255.0;
        let b = f64::from(self.blue) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let saturation = if max > 0.0 { delta / max } else { 0.0 };
        if delta <= 0.0 {
            return (0.0, saturation);
        }
        let sector = if (max - r).abs() < f64::EPSILON {
            ((g - b) / delta).rem_euclid(6.0)
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        (sector / 6.0, saturation)
    }

    /// The default palette.
    #[must_use]
    pub fn default_palette() -> Vec<Self> {
        DEFAULT_PALETTE
            .iter()
            .filter_map(|hex| hex.parse().ok())
            .collect()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for HexColor {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ArgumentError::InvalidColor {
            token: s.to_string(),
        };
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for HexColor {
    type Error = ArgumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

/// A `#RRGGBB|zone|zone…` script argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorArgument {
    pub color: HexColor,
    pub zones: Vec<String>,
}

impl ColorArgument {
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] without an argument and
    /// [`ArgumentError::InvalidColor`] when the colour token is malformed.
    pub fn parse(raw: Option<&str>) -> Result<Self, ArgumentError> {
        let ScriptArgument { primary, zones } = ScriptArgument::parse(raw)?;
        Ok(Self {
            color: primary.parse()?,
            zones,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn should_parse_upper_and_lower_case_hex() {
        assert_eq!("#FF0080".parse::<HexColor>().unwrap(), HexColor::new(255, 0, 128));
        assert_eq!("#00ff00".parse::<HexColor>().unwrap(), HexColor::new(0, 255, 0));
    }

    #[test]
    fn should_reject_malformed_colors() {
        for token in ["ff0000", "#ff00", "#gg0000", "#ff00000", "red", "#+F0000", "#-10000"] {
            assert!(matches!(
                token.parse::<HexColor>(),
                Err(ArgumentError::InvalidColor { .. })
            ));
        }
    }

    #[test]
    fn should_convert_primary_colors_to_hue_saturation() {
        let (h, s) = HexColor::new(255, 0, 0).hue_saturation();
        assert!(close(h, 0.0) && close(s, 1.0));
        let (h, s) = HexColor::new(0, 255, 0).hue_saturation();
        assert!(close(h, 1.0 / 3.0) && close(s, 1.0));
        let (h, s) = HexColor::new(0, 0, 255).hue_saturation();
        assert!(close(h, 2.0 / 3.0) && close(s, 1.0));
    }

    #[test]
    fn should_have_zero_saturation_for_grey() {
        let (h, s) = HexColor::new(128, 128, 128).hue_saturation();
        assert!(close(h, 0.0) && close(s, 0.0));
    }

    #[test]
    fn should_wrap_negative_hue_sector() {
        let (h, _) = HexColor::new(255, 0, 128).hue_saturation();
        assert!(h > 0.9 && h < 1.0);
    }

    #[test]
    fn should_load_complete_default_palette() {
        assert_eq!(HexColor::default_palette().len(), DEFAULT_PALETTE.len());
    }

    #[test]
    fn should_parse_color_argument_with_zones() {
        let arg = ColorArgument::parse(Some("#0000ff|Office")).unwrap();
        assert_eq!(arg.color, HexColor::new(0, 0, 255));
        assert_eq!(arg.zones, vec!["Office"]);
    }

    #[test]
    fn should_serialize_as_hex_string() {
        let json = serde_json::to_string(&HexColor::new(255, 165, 0)).unwrap();
        assert_eq!(json, "\"#ffa500\"");
    }
}
