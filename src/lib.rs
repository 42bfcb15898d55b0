mod availability;
mod consts;
mod parts;
mod prelude;
mod range;
mod settings;
mod types;
mod widget;

pub use availability::{AvailabilityBinding, OptionAvailabilityFilter, SelectableOption};
pub use consts::*;
pub use parts::DateParts;
pub use range::{Endpoint, RangeError, RangeValue};
pub use settings::{DatePartOrderConfig, WidgetSettings};
pub use types::{DateOrder, DatePart, DatetimeType, Increment, TimeType};
pub use widget::{DatelistWidget, FieldWidget, SubmittedValues};

use crate::prelude::*;
use serde::Serialize;

/// Ordered date/time parts used to render, and later interpret, one endpoint
/// of a range. The same sequence must be used for both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Serialize)]
pub struct DatePartSequence(Vec<DatePart>);

impl DatePartSequence {
    /// Returns true if the sequence uses a 12 hour clock
    pub fn is_twelve_hour(&self) -> bool {
        self.0.contains(&DatePart::Ampm)
    }

    /// Returns true if the sequence carries any time parts
    pub fn has_time(&self) -> bool {
        self.0.contains(&DatePart::Hour)
    }
}

impl FromIterator<DatePart> for DatePartSequence {
    fn from_iter<I: IntoIterator<Item = DatePart>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for DatePartSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// Error for a single date part or setting value.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PartError {
    #[display(fmt = "Unknown date part: {_0}")]
    UnknownPart(String),
    #[display(fmt = "Invalid increment: {} (must be one of {:?})", "_0", ALLOWED_INCREMENTS)]
    InvalidIncrement(u8),
    #[display(fmt = "Invalid setting value: {_0:?}")]
    InvalidSetting(String),
    #[display(fmt = "A value must be selected for {_0}")]
    MissingPart(DatePart),
    #[display(fmt = "Invalid value for {part}: {value:?}")]
    InvalidValue { part: DatePart, value: String },
    #[display(fmt = "Value {value} out of range for {part}")]
    OutOfRange { part: DatePart, value: i64 },
    #[display(fmt = "Invalid date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i64, month: i64, day: i64 },
}

impl std::error::Error for PartError {}

/// Builds the part order for one endpoint of the range.
///
/// Total over its input: unrecognized settings have already resolved to
/// `YMD` / no time parts when the config was read.
pub fn build_part_order(config: &DatePartOrderConfig) -> DatePartSequence {
    config
        .date_order
        .parts()
        .into_iter()
        .chain(config.time_type.parts().iter().copied())
        .collect()
}

/// Render-time description of one datelist element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub part_order: DatePartSequence,
    /// `None` when the field carries no time parts
    pub increment:  Option<Increment>,
}

/// The start and end elements of a range. Both always share part order and
/// increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSpec {
    pub start: FieldSpec,
    pub end:   FieldSpec,
}

impl RenderSpec {
    /// The sequence shared by both endpoints
    pub const fn part_order(&self) -> &DatePartSequence {
        &self.start.part_order
    }
}

/// Applies one sequence and increment to both endpoints of a range.
pub fn apply_to_range_fields(sequence: DatePartSequence, increment: Option<Increment>) -> RenderSpec {
    let field = FieldSpec {
        part_order: sequence,
        increment,
    };
    RenderSpec {
        start: field.clone(),
        end:   field,
    }
}
