//! Anchor identifiers and the table-of-contents index.
//!
//! Runs after resolution in three passes over the tree:
//!
//! 1. Claim every explicit identifier (anchor ids, `{#id}` headings, the title
//!    section's `overview`). A second claim of the same id is an error.
//! 2. Derive identifiers for the remaining headings from their text, suffixed
//!    until they avoid every id already taken.
//! 3. Collect anchor entries in document order.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::CompileOptions;
use crate::component::Component;
use crate::error::CompileError;
use crate::tree::Node;

/// Identifier of a rendered title section.
pub const OVERVIEW_ID: &str = "overview";

/// Label of a title section without a title.
const OVERVIEW_LABEL: &str = "Overview";

/// Fallback for headings whose text has no slug characters.
const SECTION_ID: &str = "section";

/// What produced an anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnchorSource {
    /// Section heading of the given level.
    Heading { level: u8 },
    /// Explicit `Anchor` component.
    Component,
    /// Rendered title section.
    TitleSection,
}

/// Table-of-contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnchorEntry {
    /// Identifier, unique within the document.
    pub id: String,
    /// Human-readable label.
    pub label: String,
    /// Pre-order ordinal of the node in the document tree.
    pub position: usize,
    /// Source line.
    pub line: usize,
    /// What produced the anchor.
    pub source: AnchorSource,
}

impl AnchorEntry {
    /// Heading level, if the anchor comes from a heading.
    #[must_use]
    pub fn level(&self) -> Option<u8> {
        match self.source {
            AnchorSource::Heading { level } => Some(level),
            AnchorSource::Component | AnchorSource::TitleSection => None,
        }
    }
}

/// Convert text to a URL-friendly identifier.
///
/// Keeps lowercase ASCII alphanumerics; runs of whitespace, `-` and `_`
/// become a single `-`; everything else is dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}

/// Assign heading identifiers and collect the anchor index.
pub(crate) fn assign(nodes: &mut [Node], options: &CompileOptions) -> Result<Vec<AnchorEntry>, CompileError> {
    let mut claimed: HashMap<String, usize> = HashMap::new();
    walk_mut(nodes, &mut |node, _| {
        if let Some((id, line)) = explicit_id(node) {
            if let Some(&first_line) = claimed.get(id) {
                return Err(CompileError::DuplicateAnchor {
                    id: id.to_owned(),
                    first_line,
                    line,
                });
            }
            claimed.insert(id.to_owned(), line);
        }
        Ok(())
    })?;

    let mut taken: HashSet<String> = claimed.into_keys().collect();
    walk_mut(nodes, &mut |node, _| {
        if let Node::Heading(heading) = node
            && !heading.explicit_id
        {
            heading.id = unique_id(&slugify(&heading.label), &taken);
            taken.insert(heading.id.clone());
        }
        Ok(())
    })?;

    let mut entries = Vec::new();
    walk_mut(nodes, &mut |node, position| {
        if let Some(entry) = entry(node, position, options) {
            entries.push(entry);
        }
        Ok(())
    })?;
    Ok(entries)
}

fn explicit_id(node: &Node) -> Option<(&str, usize)> {
    match node {
        Node::Heading(heading) if heading.explicit_id => Some((&heading.id, heading.line)),
        Node::Component(component) => match &component.component {
            Component::Anchor { id, .. } => Some((id, component.line)),
            Component::TitleSection(block) if !block.is_empty() => Some((OVERVIEW_ID, component.line)),
            _ => None,
        },
        _ => None,
    }
}

fn unique_id(base: &str, taken: &HashSet<String>) -> String {
    let base = if base.is_empty() { SECTION_ID } else { base };
    if !taken.contains(base) {
        return base.to_owned();
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_owned())
}

fn entry(node: &Node, position: usize, options: &CompileOptions) -> Option<AnchorEntry> {
    let (id, label, line, source) = match node {
        Node::Heading(heading) if options.lists_heading(heading.level) => (
            heading.id.clone(),
            heading.label.clone(),
            heading.line,
            AnchorSource::Heading { level: heading.level },
        ),
        Node::Component(component) => match &component.component {
            Component::Anchor { id, label, .. } => {
                (id.clone(), label.clone(), component.line, AnchorSource::Component)
            }
            Component::TitleSection(block) if !block.is_empty() => (
                OVERVIEW_ID.to_owned(),
                block.title.clone().unwrap_or_else(|| OVERVIEW_LABEL.to_owned()),
                component.line,
                AnchorSource::TitleSection,
            ),
            _ => return None,
        },
        _ => return None,
    };

    Some(AnchorEntry {
        id,
        label,
        position,
        line,
        source,
    })
}

/// Pre-order traversal with node ordinals.
fn walk_mut<F>(nodes: &mut [Node], visit: &mut F) -> Result<(), CompileError>
where
    F: FnMut(&mut Node, usize) -> Result<(), CompileError>,
{
    fn go<F>(nodes: &mut [Node], ordinal: &mut usize, visit: &mut F) -> Result<(), CompileError>
    where
        F: FnMut(&mut Node, usize) -> Result<(), CompileError>,
    {
        for node in nodes {
            visit(node, *ordinal)?;
            *ordinal += 1;
            go(node.children_mut(), ordinal, visit)?;
        }
        Ok(())
    }

    let mut ordinal = 0;
    go(nodes, &mut ordinal, visit)
}
