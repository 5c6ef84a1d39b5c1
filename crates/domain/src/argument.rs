//! Script argument parsing.
//!
//! Scripts receive one free-form string of `|`-separated tokens. Lighting
//! scripts read a primary token (level or colour) followed by zone names;
//! the random colour script only takes zone names.

use crate::error::ArgumentError;

const SEPARATOR: char = '|';

/// A `primary|zone|zone…` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptArgument {
    pub primary: String,
    pub zones: Vec<String>,
}

impl ScriptArgument {
    /// Split a required argument into its primary token and zone names.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] when `raw` is absent or empty.
    pub fn parse(raw: Option<&str>) -> Result<Self, ArgumentError> {
        let raw = raw.filter(|r| !r.is_empty()).ok_or(ArgumentError::Missing)?;
        let mut tokens = raw.split(SEPARATOR);
        let primary = tokens.next().unwrap_or_default().to_string();
        Ok(Self {
            primary,
            zones: tokens.map(str::to_string).collect(),
        })
    }

    /// Zone names from an optional `zone|zone…` argument.
    #[must_use]
    pub fn zones_only(raw: Option<&str>) -> Vec<String> {
        raw.filter(|r| !r.is_empty())
            .map(|r| r.split(SEPARATOR).map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Integer prefix of `token`, read the way the hub scripts read numbers:
/// leading whitespace, an optional sign, then at least one digit. Anything
/// after the digits is ignored.
#[must_use]
pub fn leading_integer(token: &str) -> Option<i64> {
    let trimmed = token.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}
