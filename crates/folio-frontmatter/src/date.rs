//! Date-like metadata values.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical (serialized) date format.
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Timestamps without an offset, as YAML and most editors write them.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Human-readable date format, e.g. "March 4, 2024".
const DISPLAY_FORMAT: &str = "%B %-d, %Y";

/// A metadata value that may hold a calendar date.
///
/// Values that parse as dates (`2024-03-04`, or a timestamp with or without
/// an offset) are
/// kept as [`NaiveDate`] so presentation code can format them uniformly.
/// Anything else (`2023`, `Spring 2022`) is preserved as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateValue {
    /// A calendar date.
    Date(NaiveDate),
    /// Free-form text, shown verbatim.
    Text(String),
}

impl DateValue {
    /// Interpret a raw string, recognizing dates.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, ISO_FORMAT) {
            return Self::Date(date);
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::Date(datetime.date_naive());
        }
        if let Some(datetime) = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        {
            return Self::Date(datetime.date());
        }
        Self::Text(raw.to_owned())
    }

    /// The date, if this value is one.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::Text(_) => None,
        }
    }

    /// Whether the value carries no information (empty text).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    /// Canonical form used when serializing (`YYYY-MM-DD` for dates).
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Date(date) => date.format(ISO_FORMAT).to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format(DISPLAY_FORMAT)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DateValueVisitor)
    }
}

struct DateValueVisitor;

impl Visitor<'_> for DateValueVisitor {
    type Value = DateValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a date or a scalar value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(DateValue::parse(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(DateValue::Text(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(DateValue::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(DateValue::Text(v.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        let value = DateValue::parse("2024-03-04");
        assert_eq!(
            value,
            DateValue::Date(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
        );
        assert_eq!(value.to_string(), "March 4, 2024");
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let value = DateValue::parse("2023-11-20T09:30:00Z");
        assert_eq!(value.to_string(), "November 20, 2023");
    }

    #[test]
    fn test_parse_timestamp_without_offset() {
        let expected = DateValue::Date(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        for raw in [
            "2024-03-04T10:15:00",
            "2024-03-04T10:15:00.250",
            "2024-03-04T10:15",
            "2024-03-04 10:15:00",
            "2024-03-04 10:15",
        ] {
            assert_eq!(DateValue::parse(raw), expected, "{raw}");
        }
        assert!(matches!(DateValue::parse("2024-03-04 25:00"), DateValue::Text(_)));
    }

    #[test]
    fn test_parse_text() {
        let value = DateValue::parse("Spring 2022");
        assert_eq!(value, DateValue::Text("Spring 2022".to_owned()));
        assert_eq!(value.to_string(), "Spring 2022");
        assert!(value.as_date().is_none());
    }

    #[test]
    fn test_invalid_calendar_date_is_text() {
        let value = DateValue::parse("2024-02-30");
        assert!(matches!(value, DateValue::Text(_)));
    }

    #[test]
    fn test_canonical() {
        assert_eq!(DateValue::parse("2024-03-04").canonical(), "2024-03-04");
        assert_eq!(DateValue::parse("2023").canonical(), "2023");
    }

    #[test]
    fn test_blank() {
        assert!(DateValue::Text("  ".to_owned()).is_blank());
        assert!(!DateValue::parse("2024-01-01").is_blank());
    }

    #[test]
    fn test_deserialize_number_as_text() {
        let value: DateValue = serde_yaml::from_str("2023").unwrap();
        assert_eq!(value, DateValue::Text("2023".to_owned()));
    }

    #[test]
    fn test_serialize_date_as_iso() {
        let value = DateValue::parse("2024-03-04");
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            "\"2024-03-04\""
        );
    }
}
