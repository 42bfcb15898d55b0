use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::consts::{AM, HOURS_PER_HALF_DAY, MAX_YEAR, MIN_YEAR, MINUTES_PER_HOUR, PM};
use crate::{DatePart, DatePartSequence, Increment, PartError};

/// Integer values for the date parts of one range endpoint.
///
/// `ampm` is stored as `AM` (0) or `PM` (1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateParts(BTreeMap<DatePart, i64>);

impl DateParts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a part if present
    pub fn get(&self, part: DatePart) -> Option<i64> {
        self.0.get(&part).copied()
    }

    /// Sets a part value, returning the previous value
    pub fn insert(&mut self, part: DatePart, value: i64) -> Option<i64> {
        self.0.insert(part, value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates parts in identifier order (year, month, day, hour, minute, ampm)
    pub fn iter(&self) -> impl Iterator<Item = (DatePart, i64)> + '_ {
        self.0.iter().map(|(part, value)| (*part, *value))
    }

    /// Reads submitted key/value pairs for one endpoint.
    ///
    /// Only keys naming a part of `sequence` are read. Returns `Ok(None)` when
    /// every part is blank.
    ///
    /// # Errors
    /// Returns `PartError::MissingPart` for the first blank part (in sequence
    /// order) when some but not all parts were filled in, and
    /// `InvalidValue` / `OutOfRange` for values that cannot be a part.
    pub fn from_raw<I, K, V>(pairs: I, sequence: &DatePartSequence) -> Result<Option<Self>, PartError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = BTreeMap::new();
        for (key, value) in pairs {
            let Ok(part) = key.as_ref().parse::<DatePart>() else {
                continue;
            };
            let value = value.as_ref().trim();
            if sequence.contains(&part) && !value.is_empty() {
                raw.insert(part, value.to_owned());
            }
        }

        if raw.is_empty() {
            return Ok(None);
        }

        let twelve_hour = sequence.is_twelve_hour();
        let mut parts = Self::new();
        for &part in sequence.iter() {
            let value = raw.get(&part).ok_or(PartError::MissingPart(part))?;
            parts.insert(part, parse_part(part, value, twelve_hour)?);
        }
        Ok(Some(parts))
    }

    /// Builds the part values shown for a stored date.
    ///
    /// Minutes are rounded to the nearest increment, carrying into the hour,
    /// and seconds are dropped.
    pub fn from_datetime(datetime: NaiveDateTime, sequence: &DatePartSequence, increment: Option<Increment>) -> Self {
        let datetime = match increment {
            Some(increment) if sequence.has_time() => round_to_increment(datetime, increment),
            _ => datetime,
        };
        let twelve_hour = sequence.is_twelve_hour();

        let mut parts = Self::new();
        for &part in sequence.iter() {
            let value = match part {
                DatePart::Year => i64::from(datetime.year()),
                DatePart::Month => i64::from(datetime.month()),
                DatePart::Day => i64::from(datetime.day()),
                DatePart::Hour if twelve_hour => {
                    let (_, hour) = datetime.hour12();
                    i64::from(hour)
                }
                DatePart::Hour => i64::from(datetime.hour()),
                DatePart::Minute => i64::from(datetime.minute()),
                DatePart::Ampm => {
                    if datetime.hour12().0 {
                        PM
                    } else {
                        AM
                    }
                }
            };
            parts.insert(part, value);
        }
        parts
    }

    /// Builds the part values for a Unix timestamp (UTC).
    ///
    /// The parts only hold what the select lists can show: seconds are
    /// dropped and minutes rounded to `increment`, so [`DateParts::timestamp`]
    /// gives back the same timestamp only when it already sits on an
    /// increment boundary. Returns None when the (rounded) year falls outside
    /// `MIN_YEAR..=MAX_YEAR`.
    pub fn from_timestamp(timestamp: i64, sequence: &DatePartSequence, increment: Option<Increment>) -> Option<Self> {
        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)?.naive_utc();
        let parts = Self::from_datetime(datetime, sequence, increment);
        let year = parts.get(DatePart::Year).unwrap_or_else(|| i64::from(datetime.year()));
        (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(parts)
    }

    /// Interprets the parts with the sequence they were rendered with.
    ///
    /// Time parts absent from the sequence resolve to midnight.
    ///
    /// # Errors
    /// Returns `PartError::MissingPart` if a part of the sequence has no value,
    /// `OutOfRange` for values outside the part's domain and `InvalidDate` for
    /// a day that does not exist in the month.
    pub fn to_datetime(&self, sequence: &DatePartSequence) -> Result<NaiveDateTime, PartError> {
        let twelve_hour = sequence.is_twelve_hour();
        let value = |part: DatePart| -> Result<i64, PartError> {
            let value = self.get(part).ok_or(PartError::MissingPart(part))?;
            check_range(part, value, twelve_hour)
        };

        let year = value(DatePart::Year)?;
        let month = value(DatePart::Month)?;
        let day = value(DatePart::Day)?;

        let (hour, minute) = if sequence.has_time() {
            let mut hour = value(DatePart::Hour)?;
            if twelve_hour {
                hour %= i64::from(HOURS_PER_HALF_DAY);
                if value(DatePart::Ampm)? == PM {
                    hour += i64::from(HOURS_PER_HALF_DAY);
                }
            }
            let minute = if sequence.contains(&DatePart::Minute) {
                value(DatePart::Minute)?
            } else {
                0
            };
            (hour, minute)
        } else {
            (0, 0)
        };

        let invalid_date = || PartError::InvalidDate { year, month, day };
        let date = NaiveDate::from_ymd_opt(
            i32::try_from(year).map_err(|_| invalid_date())?,
            u32::try_from(month).map_err(|_| invalid_date())?,
            u32::try_from(day).map_err(|_| invalid_date())?,
        )
        .ok_or_else(invalid_date)?;

        // hour and minute were range checked above
        let hour = u32::try_from(hour).map_err(|_| PartError::OutOfRange { part: DatePart::Hour, value: hour })?;
        let minute =
            u32::try_from(minute).map_err(|_| PartError::OutOfRange { part: DatePart::Minute, value: minute })?;
        date.and_hms_opt(hour, minute, 0)
            .ok_or(PartError::OutOfRange { part: DatePart::Hour, value: i64::from(hour) })
    }

    /// Unix timestamp (UTC) of the parts
    ///
    /// # Errors
    /// See [`DateParts::to_datetime`].
    pub fn timestamp(&self, sequence: &DatePartSequence) -> Result<i64, PartError> {
        Ok(self.to_datetime(sequence)?.and_utc().timestamp())
    }
}

impl FromIterator<(DatePart, i64)> for DateParts {
    fn from_iter<I: IntoIterator<Item = (DatePart, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn parse_part(part: DatePart, value: &str, twelve_hour: bool) -> Result<i64, PartError> {
    let parsed = if part == DatePart::Ampm {
        match value.to_ascii_lowercase().as_str() {
            "am" => Some(AM),
            "pm" => Some(PM),
            other => other.parse::<i64>().ok(),
        }
    } else {
        value.parse::<i64>().ok()
    };

    let parsed = parsed.ok_or_else(|| PartError::InvalidValue {
        part,
        value: value.to_owned(),
    })?;
    check_range(part, parsed, twelve_hour)
}

fn check_range(part: DatePart, value: i64, twelve_hour: bool) -> Result<i64, PartError> {
    let range = match part {
        DatePart::Year => MIN_YEAR..=MAX_YEAR,
        DatePart::Month => 1..=12,
        DatePart::Day => 1..=31,
        DatePart::Hour if twelve_hour => 1..=i64::from(HOURS_PER_HALF_DAY),
        DatePart::Hour => 0..=23,
        DatePart::Minute => 0..=i64::from(MINUTES_PER_HOUR) - 1,
        DatePart::Ampm => AM..=PM,
    };
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(PartError::OutOfRange { part, value })
    }
}

fn round_to_increment(datetime: NaiveDateTime, increment: Increment) -> NaiveDateTime {
    let step = u32::from(increment.get());
    let rounded = (datetime.minute() + step / 2) / step * step;
    datetime
        .with_nanosecond(0)
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_minute(0))
        .and_then(|dt| dt.checked_add_signed(TimeDelta::minutes(i64::from(rounded))))
        .unwrap_or(datetime)
}
