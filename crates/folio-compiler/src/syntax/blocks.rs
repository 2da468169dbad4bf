//! Block context of body lines.
//!
//! Headings and block invocations are only recognized where markdown itself
//! sees top-level text. Lines inside code blocks and raw HTML blocks stay
//! verbatim, and headings nested in list items or block quotes stay markup.

use std::ops::RangeInclusive;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// How markdown classifies a body line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// Anything open to invocations.
    #[default]
    Text,
    /// First line of a top-level ATX heading.
    Heading,
    /// Inside a fenced or indented code block.
    Code,
    /// Inside a raw HTML block.
    Html,
}

/// Per-line block context of a body.
#[derive(Debug)]
pub(crate) struct BlockMap {
    kinds: Vec<LineKind>,
}

impl BlockMap {
    pub(crate) fn scan(body: &str) -> Self {
        let starts: Vec<usize> = std::iter::once(0)
            .chain(body.match_indices('\n').map(|(at, _)| at + 1))
            .collect();
        let line_of = |offset: usize| starts.partition_point(|&start| start <= offset).saturating_sub(1);
        let lines = |start: usize, end: usize| line_of(start)..=line_of(end.saturating_sub(1).max(start));

        let mut kinds = vec![LineKind::Text; starts.len()];
        let mut nesting = 0usize;

        for (event, range) in Parser::new_ext(body, options()).into_offset_iter() {
            match event {
                Event::Start(Tag::Item | Tag::BlockQuote(_) | Tag::FootnoteDefinition(_)) => nesting += 1,
                Event::End(TagEnd::Item | TagEnd::BlockQuote(_) | TagEnd::FootnoteDefinition) => {
                    nesting = nesting.saturating_sub(1);
                }
                Event::Start(Tag::CodeBlock(_)) => mark(&mut kinds, lines(range.start, range.end), LineKind::Code),
                Event::Start(Tag::HtmlBlock) => mark(&mut kinds, lines(range.start, range.end), LineKind::Html),
                Event::Start(Tag::Heading { .. }) if nesting == 0 => {
                    let line = line_of(range.start);
                    // Setext headings are not anchor-bearing.
                    if body[starts[line]..].trim_start_matches(' ').starts_with('#') {
                        kinds[line] = LineKind::Heading;
                    }
                }
                _ => {}
            }
        }

        Self { kinds }
    }

    /// Kind of the line at 0-based `index`.
    pub(crate) fn kind(&self, index: usize) -> LineKind {
        self.kinds.get(index).copied().unwrap_or_default()
    }
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

fn mark(kinds: &mut [LineKind], lines: RangeInclusive<usize>, kind: LineKind) {
    for line in lines {
        if let Some(slot) = kinds.get_mut(line) {
            *slot = kind;
        }
    }
}
