//! Compiled document tree.

use folio_frontmatter::Metadata;
use serde::Serialize;

use crate::anchors::AnchorEntry;
use crate::component::Component;

/// How an invocation was written in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Inside a line of text (`:Kind[...]`).
    Inline,
    /// On its own line (`::Kind` or a `:::Kind` container).
    Block,
}

/// A node of the compiled tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Markdown text, passed through unchanged.
    Markup(String),
    /// Section heading with its assigned identifier.
    Heading(Heading),
    /// Resolved component with its children.
    Component(ComponentNode),
}

/// A section heading.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Heading {
    /// Level, 1 through 6.
    pub level: u8,
    /// Identifier, unique within the document.
    pub id: String,
    /// Whether `id` was written in the source rather than derived.
    pub explicit_id: bool,
    /// Classes from the heading's `{.class}` block.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Plain-text label.
    pub label: String,
    /// Heading content.
    pub children: Vec<Node>,
    /// Source line.
    pub line: usize,
}

/// A component invocation resolved against the registry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentNode {
    /// Kind and validated attributes.
    pub component: Component,
    /// Inline or block.
    pub placement: Placement,
    /// Child content.
    pub children: Vec<Node>,
    /// Source line.
    pub line: usize,
}

/// Compiled article body.
///
/// Produced only by compilation, so every component in it has passed its
/// attribute contract and every identifier is unique.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompiledDocument {
    nodes: Vec<Node>,
    video_players: usize,
}

impl CompiledDocument {
    pub(crate) fn new(nodes: Vec<Node>, video_players: usize) -> Self {
        Self {
            nodes,
            video_players,
        }
    }

    /// Top-level nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of video players, indexed `0..video_players()` in document order.
    #[must_use]
    pub fn video_players(&self) -> usize {
        self.video_players
    }
}

impl Node {
    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Self::Markup(_) => &mut [],
            Self::Heading(heading) => &mut heading.children,
            Self::Component(component) => &mut component.children,
        }
    }
}

/// Result of compiling an article.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Compiled {
    /// Parsed frontmatter.
    pub metadata: Metadata,
    /// Compiled body.
    pub document: CompiledDocument,
    /// Anchor entries in document order.
    pub anchors: Vec<AnchorEntry>,
    /// Non-fatal problems found under the lenient attribute policy.
    pub warnings: Vec<String>,
}
