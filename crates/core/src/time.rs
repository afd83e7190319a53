//! Minute-of-day time model and the `HH:mm` boundary form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::QuietError;

/// Number of minutes in one day. The time-of-day domain is `[0, 1440)`.
pub const MINUTES_PER_DAY: u16 = 1440;

/// A time of day expressed as whole minutes since midnight.
///
/// Equality and ordering are by the underlying minute count. The only
/// textual form accepted anywhere at a boundary is zero-padded 24-hour
/// `HH:mm`; seconds do not exist in this model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Parse strict `HH:mm` (zero-padded, HH in 00-23, mm in 00-59). Any
    /// deviation in shape or range is `InvalidFormat`.
    pub fn parse(text: &str) -> Result<Self, QuietError> {
        let bytes = text.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(QuietError::InvalidFormat(text.to_string()));
        }
        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if digits.iter().any(|b| !b.is_ascii_digit()) {
            return Err(QuietError::InvalidFormat(text.to_string()));
        }
        let hour = u16::from(digits[0] - b'0') * 10 + u16::from(digits[1] - b'0');
        let minute = u16::from(digits[2] - b'0') * 10 + u16::from(digits[3] - b'0');
        if hour > 23 || minute > 59 {
            return Err(QuietError::InvalidFormat(text.to_string()));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Construct from raw minutes; `None` outside `[0, 1440)`.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Truncate an instant to its minute-of-day.
    pub fn from_datetime(instant: &DateTime<Utc>) -> Self {
        Self(instant.hour() as u16 * 60 + instant.minute() as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = QuietError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}
