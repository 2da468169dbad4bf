//! Typed article metadata.
//!
//! Recognized keys are `title`, `subtitle`, `published`, `date`, `year` and
//! `location`. Any other key is kept verbatim in [`Metadata::extra`] without
//! interpretation.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{DELIMITER, DateValue, FrontmatterError};

/// Metadata parsed from an article's frontmatter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Article title.
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    /// Secondary line shown under the title.
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtitle: Option<String>,

    /// Publication date (highest priority date field).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateValue>,

    /// Generic date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateValue>,

    /// Year, used when no precise date is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<DateValue>,

    /// Where the work was made.
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,

    /// Unrecognized keys, preserved as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Metadata {
    /// Parse metadata from the YAML content of a frontmatter block.
    ///
    /// Empty content (or an explicit YAML null) yields empty metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, is not a mapping, or a
    /// recognized key holds a non-scalar value. Reported lines are relative to
    /// `content`, and body offsets are zero.
    pub fn from_yaml(content: &str) -> Result<Self, FrontmatterError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| FrontmatterError::Yaml {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
                body_offset: 0,
            })?;

        match value {
            serde_yaml::Value::Null => Ok(Self::default()),
            serde_yaml::Value::Mapping(_) => {
                serde_yaml::from_value(value).map_err(|e| FrontmatterError::Yaml {
                    message: e.to_string(),
                    line: None,
                    body_offset: 0,
                })
            }
            _ => Err(FrontmatterError::NotAMapping { body_offset: 0 }),
        }
    }

    /// Serialize to canonical YAML (dates as `YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Returns an error if an extra value cannot be represented in YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        if self.is_empty() {
            return Ok(String::new());
        }
        serde_yaml::to_string(self)
    }

    /// Serialize to a complete canonical frontmatter block, delimiters included.
    ///
    /// Splitting the result yields metadata equal to `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if an extra value cannot be represented in YAML.
    pub fn to_frontmatter(&self) -> Result<String, serde_yaml::Error> {
        let yaml = self.to_yaml()?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
    }

    /// The date to display: first present of `published`, `date`, `year`.
    ///
    /// Blank values are skipped.
    #[must_use]
    pub fn effective_date(&self) -> Option<&DateValue> {
        [&self.published, &self.date, &self.year]
            .into_iter()
            .flatten()
            .find(|value| !value.is_blank())
    }

    /// Check if no key was set at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.published.is_none()
            && self.date.is_none()
            && self.year.is_none()
            && self.location.is_none()
            && self.extra.is_empty()
    }
}

/// Deserialize an optional scalar as text (`title: 2024` becomes `"2024"`).
fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    deserializer.deserialize_any(TextVisitor)
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_owned()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_empty_yaml() {
        let meta = Metadata::from_yaml("").unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn test_parse_whitespace_only() {
        let meta = Metadata::from_yaml("   \n\t  ").unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn test_parse_null_document() {
        let meta = Metadata::from_yaml("~").unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn test_parse_all_fields() {
        let yaml = r#"
title: "Arboretum"
subtitle: Procedural trees
published: 2024-03-04
location: Lisbon
"#;
        let meta = Metadata::from_yaml(yaml).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Arboretum"));
        assert_eq!(meta.subtitle.as_deref(), Some("Procedural trees"));
        assert_eq!(meta.location.as_deref(), Some("Lisbon"));
        assert_eq!(
            meta.published.as_ref().map(ToString::to_string),
            Some("March 4, 2024".to_owned())
        );
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let yaml = "title: T\ntags:\n  - rust\ndraft: true";
        let meta = Metadata::from_yaml(yaml).unwrap();
        assert_eq!(meta.title.as_deref(), Some("T"));
        assert_eq!(meta.extra.len(), 2);
        assert_eq!(meta.extra.get("draft"), Some(&serde_yaml::Value::Bool(true)));
        assert!(meta.extra["tags"].is_sequence());
    }

    #[test]
    fn test_numeric_title_becomes_text() {
        let meta = Metadata::from_yaml("title: 1984").unwrap();
        assert_eq!(meta.title.as_deref(), Some("1984"));
    }

    #[test]
    fn test_null_title_is_absent() {
        let meta = Metadata::from_yaml("title:\nsubtitle: S").unwrap();
        assert!(meta.title.is_none());
        assert_eq!(meta.subtitle.as_deref(), Some("S"));
    }

    #[test]
    fn test_list_title_is_error() {
        let result = Metadata::from_yaml("title:\n  - a\n  - b");
        assert!(matches!(result, Err(FrontmatterError::Yaml { .. })));
    }

    #[test]
    fn test_scalar_document_is_not_mapping() {
        let result = Metadata::from_yaml("just a string");
        assert!(matches!(result, Err(FrontmatterError::NotAMapping { .. })));
    }

    #[test]
    fn test_effective_date_priority() {
        let meta = Metadata::from_yaml("year: 2021\ndate: 2022-05-01\npublished: 2023-06-02").unwrap();
        assert_eq!(meta.effective_date().unwrap().to_string(), "June 2, 2023");

        let meta = Metadata::from_yaml("year: 2021\ndate: 2022-05-01").unwrap();
        assert_eq!(meta.effective_date().unwrap().to_string(), "May 1, 2022");

        let meta = Metadata::from_yaml("year: 2021").unwrap();
        assert_eq!(meta.effective_date().unwrap().to_string(), "2021");
    }

    #[test]
    fn test_effective_date_skips_blank() {
        let meta = Metadata::from_yaml("published: ''\nyear: 2020").unwrap();
        assert_eq!(meta.effective_date().unwrap().to_string(), "2020");
    }

    #[test]
    fn test_to_yaml_empty() {
        assert_eq!(Metadata::default().to_yaml().unwrap(), "");
        assert_eq!(Metadata::default().to_frontmatter().unwrap(), "---\n---\n");
    }

    #[test]
    fn test_to_yaml_uses_iso_dates() {
        let meta = Metadata::from_yaml("date: 2024-03-04").unwrap();
        let yaml = meta.to_yaml().unwrap();
        assert!(yaml.contains("2024-03-04"), "{yaml}");
        assert_eq!(Metadata::from_yaml(&yaml).unwrap(), meta);
    }

    #[test]
    fn test_serialize_json() {
        let meta = Metadata::from_yaml("title: T\ndate: 2024-03-04").unwrap();
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json, serde_json::json!({"title": "T", "date": "2024-03-04"}));
    }
}
