//! Compilation options.

use std::ops::RangeInclusive;

use serde::Deserialize;

/// What to do when an enumerated attribute has an unknown value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributePolicy {
    /// Fail compilation with [`CompileError::InvalidAttribute`](crate::CompileError::InvalidAttribute).
    #[default]
    Strict,
    /// Use the attribute's default value and record a warning.
    Lenient,
}

/// Options controlling compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Handling of out-of-range attribute values.
    pub attribute_policy: AttributePolicy,
    /// Whether headings produce anchor entries.
    pub heading_anchors: bool,
    /// Heading levels that produce anchor entries.
    pub toc_levels: RangeInclusive<u8>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            attribute_policy: AttributePolicy::Strict,
            heading_anchors: true,
            toc_levels: 2..=3,
        }
    }
}

impl CompileOptions {
    /// Set the attribute policy.
    #[must_use]
    pub fn with_attribute_policy(mut self, policy: AttributePolicy) -> Self {
        self.attribute_policy = policy;
        self
    }

    /// Enable or disable heading anchor entries.
    #[must_use]
    pub fn with_heading_anchors(mut self, enabled: bool) -> Self {
        self.heading_anchors = enabled;
        self
    }

    /// Set the heading levels that produce anchor entries.
    #[must_use]
    pub fn with_toc_levels(mut self, levels: RangeInclusive<u8>) -> Self {
        self.toc_levels = levels;
        self
    }

    pub(crate) fn lists_heading(&self, level: u8) -> bool {
        self.heading_anchors && self.toc_levels.contains(&level)
    }
}
