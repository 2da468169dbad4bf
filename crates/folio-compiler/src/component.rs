//! Component registry.
//!
//! The set of component kinds is closed: an invocation either names one of
//! [`ComponentKind::ALL`] or fails compilation.

use std::fmt;

use folio_frontmatter::DateValue;
use serde::Serialize;

/// Registered component kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ComponentKind {
    Highlight,
    Callout,
    Anchor,
    TitleSection,
    VideoPlayer,
    ImageStack,
    DemoButton,
}

impl ComponentKind {
    /// Every registered kind.
    pub const ALL: [Self; 7] = [
        Self::Highlight,
        Self::Callout,
        Self::Anchor,
        Self::TitleSection,
        Self::VideoPlayer,
        Self::ImageStack,
        Self::DemoButton,
    ];

    /// Look up a kind by its source name (case-sensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Source name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Highlight => "Highlight",
            Self::Callout => "Callout",
            Self::Anchor => "Anchor",
            Self::TitleSection => "TitleSection",
            Self::VideoPlayer => "VideoPlayer",
            Self::ImageStack => "ImageStack",
            Self::DemoButton => "DemoButton",
        }
    }

    /// Attribute names accepted by this kind.
    #[must_use]
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            Self::Highlight => &["color"],
            Self::Callout => &["type"],
            Self::Anchor => &["id", "title", "visible"],
            Self::TitleSection => &["title", "subtitle", "published", "date", "year", "location"],
            Self::VideoPlayer => &["width", "height", "videoUrl", "gifUrl"],
            Self::ImageStack => &[],
            Self::DemoButton => &["href"],
        }
    }

    /// Whether invocations may carry child content.
    #[must_use]
    pub fn accepts_children(self) -> bool {
        !matches!(self, Self::TitleSection | Self::VideoPlayer)
    }

    /// Whether invocations must stand on their own line.
    #[must_use]
    pub fn block_only(self) -> bool {
        matches!(self, Self::TitleSection | Self::VideoPlayer)
    }

    /// Comma-separated list of every kind name.
    pub(crate) fn names() -> String {
        Self::ALL.map(Self::name).join(", ")
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An attribute restricted to a fixed set of values.
pub(crate) trait Enumerated: Copy + Default + 'static {
    const VALUES: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        Self::VALUES.iter().copied().find(|value| value.as_str() == raw)
    }

    fn expected() -> String {
        let names: Vec<_> = Self::VALUES.iter().map(|value| value.as_str()).collect();
        format!("one of {}", names.join(", "))
    }
}

/// Highlight background color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    #[default]
    Yellow,
    Blue,
    Green,
    Red,
}

impl Enumerated for HighlightColor {
    const VALUES: &'static [Self] = &[Self::Yellow, Self::Blue, Self::Green, Self::Red];

    fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
        }
    }
}

/// Callout flavor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    #[default]
    Info,
    Warning,
    Success,
    Error,
}

impl Enumerated for CalloutKind {
    const VALUES: &'static [Self] = &[Self::Info, Self::Warning, Self::Success, Self::Error];

    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Anchor `visible` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Visibility(pub bool);

impl Default for Visibility {
    fn default() -> Self {
        Self(true)
    }
}

impl Enumerated for Visibility {
    const VALUES: &'static [Self] = &[Self(true), Self(false)];

    fn as_str(self) -> &'static str {
        if self.0 { "true" } else { "false" }
    }
}

/// Header block fields, merged from metadata and invocation overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TitleBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Effective date: first present of `published`, `date`, `year`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl TitleBlock {
    /// Whether every field is absent. An empty block renders nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.subtitle.is_none() && self.date.is_none() && self.location.is_none()
    }
}

/// Video with a still-image fallback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPlayer {
    /// Position among the document's video players.
    pub index: usize,
    pub width: String,
    pub height: String,
    pub video_url: String,
    pub fallback_url: String,
}

/// A resolved component with validated attributes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Highlight {
        color: HighlightColor,
    },
    Callout {
        kind: CalloutKind,
    },
    Anchor {
        id: String,
        label: String,
        visible: bool,
    },
    TitleSection(TitleBlock),
    VideoPlayer(VideoPlayer),
    ImageStack,
    DemoButton {
        href: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrips_all() {
        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(ComponentKind::from_name("highlight"), None);
        assert_eq!(ComponentKind::from_name("Carousel"), None);
    }

    #[test]
    fn test_children_contract() {
        assert!(ComponentKind::Callout.accepts_children());
        assert!(!ComponentKind::VideoPlayer.accepts_children());
        assert!(!ComponentKind::TitleSection.accepts_children());
    }

    #[test]
    fn test_placement_contract() {
        assert!(ComponentKind::VideoPlayer.block_only());
        assert!(ComponentKind::TitleSection.block_only());
        assert!(!ComponentKind::Anchor.block_only());
        assert!(!ComponentKind::DemoButton.block_only());
    }

    #[test]
    fn test_enumerated_parse() {
        assert_eq!(HighlightColor::parse("blue"), Some(HighlightColor::Blue));
        assert_eq!(HighlightColor::parse("purple"), None);
        assert_eq!(HighlightColor::parse("Blue"), None);
        assert_eq!(CalloutKind::parse("error"), Some(CalloutKind::Error));
        assert_eq!(Visibility::parse("false"), Some(Visibility(false)));
        assert_eq!(Visibility::default(), Visibility(true));
    }

    #[test]
    fn test_expected_lists_values() {
        assert_eq!(HighlightColor::expected(), "one of yellow, blue, green, red");
        assert_eq!(CalloutKind::expected(), "one of info, warning, success, error");
    }

    #[test]
    fn test_title_block_empty() {
        assert!(TitleBlock::default().is_empty());
        let block = TitleBlock {
            location: Some("Oslo".to_owned()),
            ..TitleBlock::default()
        };
        assert!(!block.is_empty());
    }
}
