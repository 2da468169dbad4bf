//! Presentation-time rendering of a compiled document.
//!
//! A [`View`] owns the viewport-dependent decisions for one display of a
//! document. Each video player picks video or image once, on the first
//! observed viewport; later observations never change it.

use std::cell::OnceCell;

use folio_compiler::{CompiledDocument, Component, ComponentNode, Heading, Node, Placement};
use serde::Serialize;

use crate::components;
use crate::html::{inline_markdown_to_html, markdown_to_html};

/// Viewport width (logical pixels) from which videos play.
pub const DEFAULT_VIDEO_BREAKPOINT: u32 = 768;

/// Media shown by a video player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaChoice {
    /// The video source.
    Video,
    /// The still-image fallback.
    Image,
}

/// Presentation settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Minimum viewport width that gets video rather than the image.
    pub video_breakpoint: u32,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            video_breakpoint: DEFAULT_VIDEO_BREAKPOINT,
        }
    }
}

impl Presentation {
    /// Media for a viewport of the given width.
    #[must_use]
    pub fn choose(&self, viewport_width: u32) -> MediaChoice {
        if viewport_width >= self.video_breakpoint {
            MediaChoice::Video
        } else {
            MediaChoice::Image
        }
    }
}

/// One display of a compiled document.
#[derive(Debug)]
pub struct View<'a> {
    document: &'a CompiledDocument,
    presentation: Presentation,
    choices: Vec<OnceCell<MediaChoice>>,
}

impl<'a> View<'a> {
    /// Create a view with every video player undecided.
    #[must_use]
    pub fn new(document: &'a CompiledDocument, presentation: Presentation) -> Self {
        Self {
            document,
            presentation,
            choices: (0..document.video_players()).map(|_| OnceCell::new()).collect(),
        }
    }

    /// Commit every undecided video player for this viewport width.
    ///
    /// Returns how many players were newly committed.
    pub fn observe_viewport(&self, width: u32) -> usize {
        let wanted = self.presentation.choose(width);
        let mut committed = 0;
        for (index, slot) in self.choices.iter().enumerate() {
            match slot.get() {
                Some(&current) if current != wanted => {
                    tracing::debug!(index, width, ?current, "Video choice already committed");
                }
                Some(_) => {}
                None => {
                    let _ = slot.set(wanted);
                    committed += 1;
                }
            }
        }
        committed
    }

    /// Committed choice for a player, if any.
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<MediaChoice> {
        self.choices.get(index).and_then(|slot| slot.get().copied())
    }

    /// Render the document to HTML.
    #[must_use]
    pub fn render(&self) -> String {
        markdown_to_html(&self.to_markdown())
    }

    /// Markdown with component markup inlined as raw HTML.
    pub(crate) fn to_markdown(&self) -> String {
        let mut out = String::new();
        self.write_nodes(self.document.nodes(), &mut out);
        out
    }

    fn write_nodes(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Markup(text) => out.push_str(text),
                Node::Heading(heading) => self.write_heading(heading, out),
                Node::Component(component) => self.write_component(component, out),
            }
        }
    }

    fn write_heading(&self, heading: &Heading, out: &mut String) {
        block_break(out);
        for _ in 0..heading.level {
            out.push('#');
        }
        out.push(' ');
        let mut text = String::new();
        self.write_nodes(&heading.children, &mut text);
        out.push_str(text.trim());
        out.push_str(" {#");
        out.push_str(&heading.id);
        for class in &heading.classes {
            out.push_str(" .");
            out.push_str(class);
        }
        out.push_str("}\n\n");
    }

    fn write_component(&self, node: &ComponentNode, out: &mut String) {
        match &node.component {
            Component::Highlight { color } => {
                self.write_wrapped(node, "span", components::highlight_class(*color), out);
            }
            Component::Callout { kind } => {
                let tag = components::box_tag(node.placement);
                self.write_wrapped(node, tag, components::callout_class(*kind), out);
            }
            Component::ImageStack => {
                let tag = components::box_tag(node.placement);
                self.write_wrapped(node, tag, components::IMAGE_STACK_CLASS, out);
            }
            Component::Anchor { id, label, visible } => {
                let label_html = if node.children.is_empty() {
                    crate::escape_html(label)
                } else {
                    self.inline_html(&node.children)
                };
                let html = components::anchor(id, *visible, &label_html, node.placement);
                write_raw(&html, node.placement, out);
            }
            Component::TitleSection(block) => {
                write_raw(&components::title_section(block), node.placement, out);
            }
            Component::VideoPlayer(player) => {
                let html = components::video_player(
                    player,
                    self.choice(player.index),
                    self.presentation.video_breakpoint,
                );
                write_raw(&html, node.placement, out);
            }
            Component::DemoButton { href } => {
                let html = components::demo_button(href, &self.inline_html(&node.children), node.placement);
                write_raw(&html, node.placement, out);
            }
        }
    }

    /// Wrap children in an element, keeping them markdown.
    ///
    /// Block placement surrounds the tags with blank lines so the children are
    /// parsed as block content.
    fn write_wrapped(&self, node: &ComponentNode, tag: &str, class: &str, out: &mut String) {
        let block = node.placement == Placement::Block && tag == "div";
        if node.placement == Placement::Block {
            block_break(out);
        }
        out.push('<');
        out.push_str(tag);
        out.push_str(r#" class=""#);
        out.push_str(class);
        out.push_str(r#"">"#);
        if block {
            out.push_str("\n\n");
        }
        self.write_nodes(&node.children, out);
        if block {
            block_break(out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        if node.placement == Placement::Block {
            out.push_str("\n\n");
        }
    }

    fn inline_html(&self, children: &[Node]) -> String {
        let mut markdown = String::new();
        self.write_nodes(children, &mut markdown);
        inline_markdown_to_html(&markdown)
    }
}

/// Insert finished HTML. Newlines become character references so the block
/// is never cut short by a blank line.
fn write_raw(html: &str, placement: Placement, out: &mut String) {
    if html.is_empty() {
        return;
    }
    if placement == Placement::Block {
        block_break(out);
    }
    out.push_str(&html.replace('\n', "&#10;"));
    if placement == Placement::Block {
        out.push_str("\n\n");
    }
}

/// Make sure the next output starts a new markdown block.
fn block_break(out: &mut String) {
    if out.is_empty() {
        return;
    }
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
}
