//! Plain-text extraction for labels.

use pulldown_cmark::{Event, Options, Parser, TagEnd};

use crate::component::Component;
use crate::tree::Node;

/// Plain text of a node list with whitespace collapsed.
///
/// Hidden anchors and media contribute nothing.
pub(crate) fn plain_text(nodes: &[Node]) -> String {
    let mut raw = String::new();
    collect(nodes, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Markup(markdown) => markdown_text(markdown, out),
            Node::Heading(heading) => {
                out.push(' ');
                out.push_str(&heading.label);
                out.push(' ');
            }
            Node::Component(component) => match &component.component {
                Component::Anchor { visible: false, .. }
                | Component::TitleSection(_)
                | Component::VideoPlayer(_) => {}
                _ => collect(&component.children, out),
            },
        }
    }
}

/// Text of a markdown fragment, keeping its edge whitespace so adjacent
/// fragments don't run together.
fn markdown_text(markdown: &str, out: &mut String) {
    if markdown.starts_with(char::is_whitespace) {
        out.push(' ');
    }
    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph | TagEnd::Item | TagEnd::Heading(_)) => out.push(' '),
            _ => {}
        }
    }
    if markdown.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}
