//! Billing intervals accepted by the remote API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a plan bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Week,
    Month,
    Year,
}

impl Interval {
    /// All accepted intervals, shortest first.
    pub const ALL: [Interval; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Comma separated list of accepted values, for error messages.
    #[must_use]
    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(Interval::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(pub String);

impl fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a billing interval (expected one of {})",
            self.0,
            Interval::expected()
        )
    }
}

impl std::error::Error for IntervalParseError {}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(IntervalParseError(other.to_string())),
        }
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.as_str().to_string()
    }
}
