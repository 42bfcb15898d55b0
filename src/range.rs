use serde::{Deserialize, Serialize};

use crate::{DateParts, DatePartSequence, Increment, PartError, prelude::*};

/// Which end of a range a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Endpoint {
    #[display(fmt = "start")]
    Start,
    #[display(fmt = "end")]
    End,
}

/// Part values for both ends of a date range, as shown in or submitted from
/// the widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeValue {
    pub start: DateParts,
    pub end:   DateParts,
}

/// Error type for range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// End is before start.
    #[error("Invalid date range: end ({end}) is before start ({start})")]
    InvalidRange { start: i64, end: i64 },

    /// One endpoint was filled in and the other left blank.
    #[error("A value must be entered for the {0} date")]
    MissingEndpoint(Endpoint),

    /// A part of one endpoint is invalid.
    #[error("Invalid {endpoint} date: {source}")]
    Endpoint {
        endpoint: Endpoint,
        #[source]
        source:   PartError,
    },

    /// Error in a part or setting value.
    #[error(transparent)]
    Part(#[from] PartError),
}

impl RangeError {
    pub(crate) fn at(endpoint: Endpoint) -> impl Fn(PartError) -> Self {
        move |source| Self::Endpoint { endpoint, source }
    }
}

impl RangeValue {
    pub const fn new(start: DateParts, end: DateParts) -> Self {
        Self { start, end }
    }

    /// Builds the values shown for a stored range of Unix timestamps (UTC).
    ///
    /// Seconds are dropped and minutes rounded to `increment`, see
    /// [`DateParts::from_timestamp`]. Returns None if either timestamp falls
    /// outside the years the widget can show.
    pub fn from_timestamps(
        start: i64,
        end: i64,
        sequence: &DatePartSequence,
        increment: Option<Increment>,
    ) -> Option<Self> {
        Some(Self {
            start: DateParts::from_timestamp(start, sequence, increment)?,
            end:   DateParts::from_timestamp(end, sequence, increment)?,
        })
    }

    /// Reconstructs both Unix timestamps (UTC).
    ///
    /// `sequence` must be the one the fields were rendered with; a different
    /// sequence silently reinterprets the parts.
    ///
    /// # Errors
    /// Returns `RangeError::Endpoint` if either side does not form a valid
    /// date, and `RangeError::InvalidRange` if the end is before the start.
    pub fn timestamps(&self, sequence: &DatePartSequence) -> Result<(i64, i64), RangeError> {
        let start = self.start.timestamp(sequence).map_err(RangeError::at(Endpoint::Start))?;
        let end = self.end.timestamp(sequence).map_err(RangeError::at(Endpoint::End))?;
        if end < start {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok((start, end))
    }
}
