use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    DatePartSequence, DateParts, Endpoint, RangeError, RangeValue, RenderSpec, WidgetSettings,
    apply_to_range_fields, build_part_order,
};

/// Form key prefix for the start of the range
const START_KEY: &str = "value";
/// Form key prefix for the end of the range
const END_KEY: &str = "end_value";

/// Raw submitted part values, keyed by part identifier, for each endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmittedValues {
    pub start: BTreeMap<String, String>,
    pub end:   BTreeMap<String, String>,
}

impl SubmittedValues {
    /// Collects flat form pairs named `value[<part>]` and `end_value[<part>]`.
    /// Other keys are ignored.
    pub fn from_form_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values = Self::default();
        for (key, value) in pairs {
            let Some((prefix, part)) = split_form_key(key.as_ref()) else {
                continue;
            };
            let side = match prefix {
                START_KEY => &mut values.start,
                END_KEY => &mut values.end,
                _ => continue,
            };
            side.insert(part.to_owned(), value.into());
        }
        values
    }
}

fn split_form_key(key: &str) -> Option<(&str, &str)> {
    let (prefix, rest) = key.split_once('[')?;
    let part = rest.strip_suffix(']')?;
    Some((prefix, part))
}

/// A field widget the host form can render and read back.
pub trait FieldWidget {
    /// Describes the elements to render for the given settings
    fn render(&self, settings: &WidgetSettings) -> RenderSpec;

    /// Reads submitted values back into a range value.
    /// Returns `Ok(None)` when nothing was entered.
    ///
    /// # Errors
    /// Returns a `RangeError` when the submission is incomplete or does not
    /// form a valid range.
    fn parse(&self, values: &SubmittedValues, settings: &WidgetSettings) -> Result<Option<RangeValue>, RangeError>;
}

/// Date range widget rendered as one select list per date part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatelistWidget;

impl DatelistWidget {
    pub const fn new() -> Self {
        Self
    }

    /// The part order used for both rendering and parsing
    pub fn part_order(settings: &WidgetSettings) -> DatePartSequence {
        build_part_order(&settings.effective_order())
    }

    /// Values shown in the elements for a stored range of Unix timestamps
    pub fn default_value(&self, start: i64, end: i64, settings: &WidgetSettings) -> Option<RangeValue> {
        let sequence = Self::part_order(settings);
        RangeValue::from_timestamps(start, end, &sequence, settings.effective_increment())
    }

    /// Parses a submission straight to `(start, end)` Unix timestamps.
    ///
    /// # Errors
    /// See [`FieldWidget::parse`].
    pub fn submit(&self, values: &SubmittedValues, settings: &WidgetSettings) -> Result<Option<(i64, i64)>, RangeError> {
        let Some(range) = self.parse(values, settings)? else {
            return Ok(None);
        };
        range.timestamps(&Self::part_order(settings)).map(Some)
    }
}

impl FieldWidget for DatelistWidget {
    fn render(&self, settings: &WidgetSettings) -> RenderSpec {
        apply_to_range_fields(Self::part_order(settings), settings.effective_increment())
    }

    fn parse(&self, values: &SubmittedValues, settings: &WidgetSettings) -> Result<Option<RangeValue>, RangeError> {
        let sequence = Self::part_order(settings);
        let start = DateParts::from_raw(&values.start, &sequence).map_err(RangeError::at(Endpoint::Start))?;
        let end = DateParts::from_raw(&values.end, &sequence).map_err(RangeError::at(Endpoint::End))?;

        let range = match (start, end) {
            (None, None) => return Ok(None),
            (Some(_), None) => return Err(RangeError::MissingEndpoint(Endpoint::End)),
            (None, Some(_)) => return Err(RangeError::MissingEndpoint(Endpoint::Start)),
            (Some(start), Some(end)) => RangeValue::new(start, end),
        };

        range.timestamps(&sequence)?;
        tracing::debug!(%sequence, "parsed date range submission");
        Ok(Some(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{config, increment_of};
    use crate::{DatePart, DatetimeType, PartError};

    fn submission(start: &[(&str, &str)], end: &[(&str, &str)]) -> SubmittedValues {
        let start = start.iter().map(|(k, v)| (format!("value[{k}]"), *v));
        let end = end.iter().map(|(k, v)| (format!("end_value[{k}]"), *v));
        SubmittedValues::from_form_pairs(start.chain(end))
    }

    #[test]
    fn test_from_form_pairs() {
        let values = SubmittedValues::from_form_pairs([
            ("value[year]", "2024"),
            ("end_value[year]", "2025"),
            ("other[year]", "1999"),
            ("value", "ignored"),
            ("value[month", "ignored"),
        ]);
        assert_eq!(values.start.len(), 1);
        assert_eq!(values.start.get("year").map(String::as_str), Some("2024"));
        assert_eq!(values.end.get("year").map(String::as_str), Some("2025"));
    }

    #[test]
    fn test_render_datetime() {
        let settings = WidgetSettings::from(config("DMY", "12", 5));
        let spec = DatelistWidget::new().render(&settings);

        assert_eq!(spec.start, spec.end);
        assert_eq!(
            &spec.part_order()[..],
            &[
                DatePart::Day,
                DatePart::Month,
                DatePart::Year,
                DatePart::Hour,
                DatePart::Minute,
                DatePart::Ampm
            ]
        );
        assert_eq!(spec.start.increment, Some(increment_of(5)));
    }

    #[test]
    fn test_render_date_only_field() {
        let settings = WidgetSettings::new(config("MDY", "24", 15), DatetimeType::Date);
        let spec = DatelistWidget::new().render(&settings);

        assert_eq!(&spec.part_order()[..], &[DatePart::Month, DatePart::Day, DatePart::Year]);
        assert_eq!(spec.start.increment, None);
        assert_eq!(spec.end.increment, None);
    }

    #[test]
    fn test_parse_valid_submission() {
        let settings = WidgetSettings::from(config("YMD", "12", 15));
        let values = submission(
            &[("year", "2024"), ("month", "8"), ("day", "15"), ("hour", "2"), ("minute", "30"), ("ampm", "pm")],
            &[("year", "2024"), ("month", "8"), ("day", "15"), ("hour", "4"), ("minute", "0"), ("ampm", "pm")],
        );

        let widget = DatelistWidget::new();
        let range = widget.parse(&values, &settings).unwrap().unwrap();
        assert_eq!(range.start.get(DatePart::Hour), Some(2));
        assert_eq!(range.start.get(DatePart::Ampm), Some(crate::PM));

        // 2024-08-15T14:30:00Z .. 2024-08-15T16:00:00Z
        assert_eq!(widget.submit(&values, &settings).unwrap(), Some((1_723_732_200, 1_723_737_600)));
    }

    #[test]
    fn test_parse_empty_submission() {
        let settings = WidgetSettings::default();
        let widget = DatelistWidget::new();
        assert_eq!(widget.parse(&SubmittedValues::default(), &settings).unwrap(), None);

        let blank = submission(&[("year", ""), ("month", "")], &[("day", "  ")]);
        assert_eq!(widget.parse(&blank, &settings).unwrap(), None);
        assert_eq!(widget.submit(&blank, &settings).unwrap(), None);
    }

    #[test]
    fn test_parse_missing_endpoint() {
        let settings = WidgetSettings::from(config("YMD", "none", 15));
        let widget = DatelistWidget::new();

        let values = submission(&[("year", "2024"), ("month", "8"), ("day", "15")], &[]);
        assert_eq!(
            widget.parse(&values, &settings),
            Err(RangeError::MissingEndpoint(Endpoint::End))
        );

        let values = submission(&[], &[("year", "2024"), ("month", "8"), ("day", "15")]);
        assert_eq!(
            widget.parse(&values, &settings),
            Err(RangeError::MissingEndpoint(Endpoint::Start))
        );
    }

    #[test]
    fn test_parse_incomplete_endpoint() {
        let settings = WidgetSettings::from(config("YMD", "24", 15));
        let values = submission(
            &[("year", "2024"), ("month", "8"), ("day", "15"), ("hour", "10")],
            &[("year", "2024"), ("month", "8"), ("day", "15"), ("hour", "11"), ("minute", "0")],
        );
        let result = DatelistWidget::new().parse(&values, &settings);
        assert_eq!(
            result,
            Err(RangeError::Endpoint {
                endpoint: Endpoint::Start,
                source:   PartError::MissingPart(DatePart::Minute),
            })
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid start date: A value must be selected for minute"
        );
    }

    #[test]
    fn test_parse_rejects_end_before_start() {
        let settings = WidgetSettings::from(config("DMY", "none", 15));
        let values = submission(
            &[("day", "16"), ("month", "8"), ("year", "2024")],
            &[("day", "15"), ("month", "8"), ("year", "2024")],
        );
        assert!(matches!(
            DatelistWidget::new().parse(&values, &settings),
            Err(RangeError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_date_only_field_ignores_time_parts() {
        let settings = WidgetSettings::new(config("YMD", "24", 15), DatetimeType::Date);
        let values = submission(
            &[("year", "2024"), ("month", "8"), ("day", "15"), ("hour", "10"), ("minute", "30")],
            &[("year", "2024"), ("month", "8"), ("day", "16")],
        );
        // 2024-08-15T00:00:00Z .. 2024-08-16T00:00:00Z
        assert_eq!(
            DatelistWidget::new().submit(&values, &settings).unwrap(),
            Some((1_723_680_000, 1_723_766_400))
        );
    }

    #[test]
    fn test_default_value_round_trips_through_form() {
        let cases = [
            WidgetSettings::from(config("YMD", "24", 15)),
            WidgetSettings::from(config("MDY", "12", 30)),
            WidgetSettings::from(config("DMY", "h12", 5)),
        ];
        let widget = DatelistWidget::new();
        let (start, end) = (1_723_732_200, 1_723_737_600);

        for settings in &cases {
            let shown = widget.default_value(start, end, settings).unwrap();
            let to_pairs = |parts: &DateParts| -> Vec<(String, String)> {
                parts.iter().map(|(part, value)| (part.to_string(), value.to_string())).collect()
            };
            let values = SubmittedValues {
                start: to_pairs(&shown.start).into_iter().collect(),
                end:   to_pairs(&shown.end).into_iter().collect(),
            };
            assert_eq!(widget.submit(&values, settings).unwrap(), Some((start, end)), "{settings:?}");
        }
    }
}
