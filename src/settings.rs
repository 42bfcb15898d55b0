//! Stored widget settings.
//!
//! Settings are owned by the host and only read here. Missing keys take the
//! widget defaults and unrecognized enum strings resolve to their permissive
//! fallbacks instead of failing.

use serde::{Deserialize, Serialize};

use crate::{DateOrder, DatetimeType, Increment, TimeType};

/// Part order configuration for one field instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatePartOrderConfig {
    pub date_order: DateOrder,
    pub time_type:  TimeType,
    pub increment:  Increment,
}

/// Widget settings together with the storage kind of the field they apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    #[serde(flatten)]
    pub order:         DatePartOrderConfig,
    pub datetime_type: DatetimeType,
}

impl WidgetSettings {
    pub const fn new(order: DatePartOrderConfig, datetime_type: DatetimeType) -> Self {
        Self { order, datetime_type }
    }

    /// The configuration actually used for rendering and parsing.
    /// Date-only fields never carry time parts.
    pub const fn effective_order(&self) -> DatePartOrderConfig {
        match self.datetime_type {
            DatetimeType::Datetime => self.order,
            DatetimeType::Date => DatePartOrderConfig {
                time_type: TimeType::None,
                ..self.order
            },
        }
    }

    /// Minute increment for the rendered fields, absent when there are no time parts
    pub fn effective_increment(&self) -> Option<Increment> {
        let order = self.effective_order();
        (order.time_type != TimeType::None).then_some(order.increment)
    }

    /// Human readable lines describing the settings
    pub fn summary(&self) -> Vec<String> {
        vec![
            format!("Date part order: {}", self.order.date_order),
            format!("Time type: {}", self.order.time_type),
            format!("Time increments: {}", self.order.increment),
        ]
    }
}

impl From<DatePartOrderConfig> for WidgetSettings {
    fn from(order: DatePartOrderConfig) -> Self {
        Self::new(order, DatetimeType::Datetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{config, increment_of};

    #[test]
    fn test_defaults() {
        let settings = WidgetSettings::default();
        assert_eq!(settings.order.date_order, DateOrder::Ymd);
        assert_eq!(settings.order.time_type, TimeType::H24);
        assert_eq!(settings.order.increment, increment_of(15));
        assert_eq!(settings.datetime_type, DatetimeType::Datetime);
    }

    #[test]
    fn test_deserialize_missing_keys_use_defaults() {
        let settings: WidgetSettings = serde_json::from_str(r#"{"date_order": "DMY"}"#).unwrap();
        assert_eq!(settings.order.date_order, DateOrder::Dmy);
        assert_eq!(settings.order.time_type, TimeType::H24);
        assert_eq!(settings.order.increment, increment_of(15));
    }

    #[test]
    fn test_deserialize_full() {
        let json = r#"{"date_order": "MDY", "time_type": "12", "increment": 5, "datetime_type": "date"}"#;
        let settings: WidgetSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.order, config("MDY", "12", 5));
        assert_eq!(settings.datetime_type, DatetimeType::Date);
    }

    #[test]
    fn test_deserialize_stored_string_settings() {
        let json = r#"{"increment": "15", "date_order": "YMD", "time_type": "24"}"#;
        let settings: WidgetSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings, WidgetSettings::default());

        let json = r#"{"increment": "30", "date_order": "DMY", "time_type": "12"}"#;
        let settings: WidgetSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.order, config("DMY", "12", 30));
    }

    #[test]
    fn test_deserialize_unknown_strings_fall_back() {
        let json = r#"{"date_order": "XYZ", "time_type": "48"}"#;
        let settings: WidgetSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.order.date_order, DateOrder::Ymd);
        assert_eq!(settings.order.time_type, TimeType::None);
    }

    #[test]
    fn test_deserialize_rejects_unlisted_increment() {
        let result = serde_json::from_str::<WidgetSettings>(r#"{"increment": 20}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<WidgetSettings>(r#"{"increment": "20"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let settings = WidgetSettings::new(config("DMY", "h12", 30), DatetimeType::Datetime);
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: WidgetSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_date_only_field_drops_time() {
        let settings = WidgetSettings::new(config("YMD", "12", 5), DatetimeType::Date);
        assert_eq!(settings.effective_order().time_type, TimeType::None);
        assert_eq!(settings.effective_order().date_order, DateOrder::Ymd);
        assert_eq!(settings.effective_increment(), None);
    }

    #[test]
    fn test_no_time_type_drops_increment() {
        let settings = WidgetSettings::from(config("YMD", "none", 5));
        assert_eq!(settings.effective_increment(), None);

        let settings = WidgetSettings::from(config("YMD", "24", 5));
        assert_eq!(settings.effective_increment(), Some(increment_of(5)));
    }

    #[test]
    fn test_summary() {
        let settings = WidgetSettings::from(config("MDY", "12", 30));
        assert_eq!(
            settings.summary(),
            vec![
                "Date part order: MDY".to_owned(),
                "Time type: 12".to_owned(),
                "Time increments: 30".to_owned(),
            ]
        );
    }
}
