use crate::PartError;
use crate::consts::{ALLOWED_INCREMENTS, DEFAULT_INCREMENT, TIME_TYPE_12, TIME_TYPE_24};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One atomic unit of a date/time value, rendered as its own select list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DatePart {
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "hour")]
    Hour,
    #[display(fmt = "minute")]
    Minute,
    #[display(fmt = "ampm")]
    Ampm,
}

impl FromStr for DatePart {
    type Err = PartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            "minute" => Ok(Self::Minute),
            "ampm" => Ok(Self::Ampm),
            other => Err(PartError::UnknownPart(other.to_owned())),
        }
    }
}

/// Order in which the date parts are presented.
///
/// Unrecognized setting strings resolve to [`DateOrder::Ymd`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateOrder {
    #[default]
    #[display(fmt = "YMD")]
    Ymd,
    #[display(fmt = "MDY")]
    Mdy,
    #[display(fmt = "DMY")]
    Dmy,
}

impl DateOrder {
    /// Resolves a stored setting string, falling back to `YMD`
    pub fn from_setting(value: &str) -> Self {
        match value.trim() {
            "YMD" => Self::Ymd,
            "MDY" => Self::Mdy,
            "DMY" => Self::Dmy,
            other => {
                tracing::debug!(setting = other, "unrecognized date order, using YMD");
                Self::Ymd
            }
        }
    }

    /// The date parts in presentation order
    pub const fn parts(self) -> [DatePart; 3] {
        match self {
            Self::Ymd => [DatePart::Year, DatePart::Month, DatePart::Day],
            Self::Mdy => [DatePart::Month, DatePart::Day, DatePart::Year],
            Self::Dmy => [DatePart::Day, DatePart::Month, DatePart::Year],
        }
    }
}

impl From<String> for DateOrder {
    fn from(value: String) -> Self {
        Self::from_setting(&value)
    }
}

impl From<DateOrder> for String {
    fn from(order: DateOrder) -> Self {
        order.to_string()
    }
}

/// Clock used for the time parts, if any.
///
/// `"24"`/`"h24"` and `"12"`/`"h12"` select a clock; every other setting
/// string (including `"none"` and the empty string) means no time parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimeType {
    #[default]
    #[display(fmt = "24")]
    H24,
    #[display(fmt = "12")]
    H12,
    #[display(fmt = "none")]
    None,
}

impl TimeType {
    /// Resolves a stored setting string, falling back to no time parts
    pub fn from_setting(value: &str) -> Self {
        let value = value.trim();
        if TIME_TYPE_24.contains(&value) {
            Self::H24
        } else if TIME_TYPE_12.contains(&value) {
            Self::H12
        } else {
            if value != "none" {
                tracing::debug!(setting = value, "unrecognized time type, omitting time parts");
            }
            Self::None
        }
    }

    /// The time parts appended after the date parts
    pub const fn parts(self) -> &'static [DatePart] {
        match self {
            Self::H24 => &[DatePart::Hour, DatePart::Minute],
            Self::H12 => &[DatePart::Hour, DatePart::Minute, DatePart::Ampm],
            Self::None => &[],
        }
    }
}

impl From<String> for TimeType {
    fn from(value: String) -> Self {
        Self::from_setting(&value)
    }
}

impl From<TimeType> for String {
    fn from(time_type: TimeType) -> Self {
        time_type.to_string()
    }
}

/// Storage kind of the field the widget edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatetimeType {
    #[display(fmt = "date")]
    Date,
    #[default]
    #[display(fmt = "datetime")]
    Datetime,
}

/// Minutes between selectable minute values.
/// Only the values in `ALLOWED_INCREMENTS` are accepted, stored either as a
/// number or as a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Increment(u8);

/// Stored form of an increment setting
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredIncrement {
    Number(u8),
    Text(String),
}

impl Increment {
    /// Creates a new Increment from a whole number of minutes
    ///
    /// # Errors
    /// Returns `PartError::InvalidIncrement` if the value is not one of `ALLOWED_INCREMENTS`.
    pub fn new(minutes: u8) -> Result<Self, PartError> {
        if ALLOWED_INCREMENTS.contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(PartError::InvalidIncrement(minutes))
        }
    }

    /// Returns the increment in minutes
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Increment {
    fn default() -> Self {
        Self(DEFAULT_INCREMENT)
    }
}

impl TryFrom<u8> for Increment {
    type Error = PartError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Increment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let increment = match StoredIncrement::deserialize(deserializer)? {
            StoredIncrement::Number(minutes) => Self::new(minutes),
            StoredIncrement::Text(text) => text
                .trim()
                .parse::<u8>()
                .map_err(|_| PartError::InvalidSetting(text.clone()))
                .and_then(Self::new),
        };
        increment.map_err(serde::de::Error::custom)
    }
}

impl From<Increment> for u8 {
    fn from(increment: Increment) -> Self {
        increment.0
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
