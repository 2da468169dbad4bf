//! Line-oriented invocation parser.
//!
//! Produces a raw tree: markup runs, ATX headings and component invocations
//! with their nested children. Component names are not checked here.

use super::InvocationArgs;
use super::blocks::{BlockMap, LineKind};
use crate::error::{ParseError, ParseErrorKind};
use crate::tree::Placement;

/// Unresolved body node.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RawNode {
    Markup(String),
    Heading(RawHeading),
    Invocation(Invocation),
}

/// ATX heading found at line level.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawHeading {
    pub level: u8,
    pub explicit_id: Option<String>,
    pub classes: Vec<String>,
    pub children: Vec<RawNode>,
    pub line: usize,
}

/// Component invocation with its arguments and nested content.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Invocation {
    pub name: String,
    pub args: InvocationArgs,
    pub placement: Placement,
    pub children: Vec<RawNode>,
    pub line: usize,
}

/// Parse an article body. `first_line` is the source line of the body's first line.
pub(crate) fn parse(body: &str, first_line: usize) -> Result<Vec<RawNode>, ParseError> {
    let blocks = BlockMap::scan(body);
    let mut parser = BlockParser::default();
    for (idx, raw_line) in body.split_inclusive('\n').enumerate() {
        parser.line(raw_line, blocks.kind(idx), first_line + idx)?;
    }
    parser.finish()
}

/// Open container on the block stack.
#[derive(Debug)]
struct Container {
    name: String,
    args: InvocationArgs,
    colons: usize,
    line: usize,
}

/// Nodes collected at one nesting level.
#[derive(Debug, Default)]
struct Frame {
    container: Option<Container>,
    nodes: Vec<RawNode>,
    markup: String,
}

impl Frame {
    fn flush(&mut self) {
        if !self.markup.is_empty() {
            self.nodes.push(RawNode::Markup(std::mem::take(&mut self.markup)));
        }
    }

    fn push(&mut self, node: RawNode) {
        match node {
            RawNode::Markup(text) => self.markup.push_str(&text),
            other => {
                self.flush();
                self.nodes.push(other);
            }
        }
    }

    fn into_nodes(mut self) -> Vec<RawNode> {
        self.flush();
        self.nodes
    }
}

#[derive(Debug)]
struct BlockParser {
    stack: Vec<Frame>,
}

impl Default for BlockParser {
    fn default() -> Self {
        Self {
            stack: vec![Frame::default()],
        }
    }
}

impl BlockParser {
    fn current(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn line(&mut self, raw_line: &str, kind: LineKind, line: usize) -> Result<(), ParseError> {
        let content = raw_line.trim_end_matches(['\n', '\r']);
        let ending = &raw_line[content.len()..];
        let trimmed = content.trim();

        // An HTML block runs to the next blank line, but a bare `:::` still
        // closes the container around it.
        let verbatim = match kind {
            LineKind::Code => true,
            LineKind::Html => !(self.in_container() && is_close_marker(trimmed)),
            LineKind::Text | LineKind::Heading => false,
        };
        if verbatim {
            self.current().markup.push_str(raw_line);
            return Ok(());
        }

        if trimmed.starts_with(":::") {
            if self.container_line(trimmed, line)? {
                return Ok(());
            }
        } else if let Some(rest) = trimmed.strip_prefix("::") {
            if let Some(node) = leaf(rest, line)? {
                self.current().push(node);
                return Ok(());
            }
        } else if kind == LineKind::Heading
            && let Some(heading) = heading(content, line)?
        {
            self.current().push(RawNode::Heading(heading));
            return Ok(());
        }

        for node in inline(content, line)? {
            self.current().push(node);
        }
        self.current().markup.push_str(ending);
        Ok(())
    }

    fn in_container(&self) -> bool {
        self.stack.last().is_some_and(|frame| frame.container.is_some())
    }

    /// Handle a line starting with three or more colons.
    ///
    /// Returns `false` if the line is ordinary text.
    fn container_line(&mut self, trimmed: &str, line: usize) -> Result<bool, ParseError> {
        let colons = trimmed.chars().take_while(|&c| c == ':').count();
        let rest = trimmed[colons..].trim_start();

        if rest.is_empty() {
            self.close(colons, line)?;
            return Ok(true);
        }

        let Some(scanned) = scan(rest, true).map_err(|kind| ParseError { line, kind })? else {
            return Ok(false);
        };
        if !rest[scanned.consumed..].trim().is_empty() {
            return Err(ParseError {
                line,
                kind: ParseErrorKind::TrailingContent { name: scanned.name },
            });
        }

        let args = InvocationArgs::parse(&scanned.content, &scanned.attrs);
        self.stack.push(Frame {
            container: Some(Container {
                name: scanned.name,
                args,
                colons,
                line,
            }),
            ..Frame::default()
        });
        Ok(true)
    }

    fn close(&mut self, colons: usize, line: usize) -> Result<(), ParseError> {
        let open = self.current().container.as_ref().map(|c| (c.name.clone(), c.colons));
        let Some((name, opened_with)) = open else {
            return Err(ParseError {
                line,
                kind: ParseErrorKind::StrayClose {
                    marker: ":".repeat(colons),
                },
            });
        };

        if colons < opened_with {
            return Err(ParseError {
                line,
                kind: ParseErrorKind::MismatchedClose {
                    name,
                    expected: opened_with,
                    found: colons,
                },
            });
        }

        if let Some(mut frame) = self.stack.pop()
            && let Some(container) = frame.container.take()
        {
            let invocation = Invocation {
                name: container.name,
                args: container.args,
                placement: Placement::Block,
                children: frame.into_nodes(),
                line: container.line,
            };
            self.current().push(RawNode::Invocation(invocation));
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<RawNode>, ParseError> {
        if let Some(container) = self.current().container.take() {
            return Err(ParseError {
                line: container.line,
                kind: ParseErrorKind::UnclosedContainer {
                    name: container.name,
                },
            });
        }
        Ok(self.stack.pop().map(Frame::into_nodes).unwrap_or_default())
    }
}

/// A line of three or more colons and nothing else.
fn is_close_marker(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b':')
}

/// Parse a leaf invocation (`rest` follows the `::`).
fn leaf(rest: &str, line: usize) -> Result<Option<RawNode>, ParseError> {
    let Some(scanned) = scan(rest, true).map_err(|kind| ParseError { line, kind })? else {
        return Ok(None);
    };
    if !rest[scanned.consumed..].trim().is_empty() {
        return Err(ParseError {
            line,
            kind: ParseErrorKind::TrailingContent { name: scanned.name },
        });
    }
    let children = inline(&scanned.content, line)?;
    Ok(Some(RawNode::Invocation(Invocation {
        args: InvocationArgs::parse(&scanned.content, &scanned.attrs),
        name: scanned.name,
        placement: Placement::Block,
        children,
        line,
    })))
}

/// Parse an ATX heading line: `## Text {#id .class}`.
fn heading(content: &str, line: usize) -> Result<Option<RawHeading>, ParseError> {
    let indent = content.len() - content.trim_start_matches(' ').len();
    if indent > 3 {
        return Ok(None);
    }
    let rest = &content[indent..];
    let hashes = rest.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return Ok(None);
    }
    let after = &rest[hashes..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return Ok(None);
    }

    let mut text = after.trim();
    let mut attributes = InvocationArgs::default();
    if let Some(inner) = text.strip_suffix('}')
        && let Some(open) = inner.rfind('{')
        && !ends_invocation(&inner[..open])
    {
        attributes = InvocationArgs::parse("", &inner[open + 1..]);
        text = text[..open].trim_end();
    }

    let without_closing = text.trim_end_matches('#');
    if without_closing.is_empty() {
        text = "";
    } else if without_closing.ends_with([' ', '\t']) {
        text = without_closing.trim_end();
    }

    Ok(Some(RawHeading {
        level: u8::try_from(hashes).unwrap_or(6),
        explicit_id: attributes.id.filter(|id| !id.is_empty()),
        classes: attributes.classes,
        children: inline(text, line)?,
        line,
    }))
}

/// Whether a `{` after `before` opens the attributes of an inline invocation.
fn ends_invocation(before: &str) -> bool {
    before.ends_with(']')
        || before.rsplit(char::is_whitespace).next().is_some_and(|word| {
            word.strip_prefix(':')
                .is_some_and(|name| name.starts_with(|c: char| c.is_ascii_uppercase()))
        })
}

/// Split one line of text into markup and inline invocations.
fn inline(text: &str, line: usize) -> Result<Vec<RawNode>, ParseError> {
    let bytes = text.as_bytes();
    let mut nodes = Vec::new();
    let mut markup_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => i = skip_code_span(text, i),
            b':' if starts_invocation(text, i) => {
                let scanned = scan(&text[i + 1..], false).map_err(|kind| ParseError { line, kind })?;
                let Some(scanned) = scanned else {
                    i += 1;
                    continue;
                };
                push_markup(&mut nodes, &text[markup_start..i]);
                nodes.push(RawNode::Invocation(Invocation {
                    args: InvocationArgs::parse(&scanned.content, &scanned.attrs),
                    children: inline(&scanned.content, line)?,
                    name: scanned.name,
                    placement: Placement::Inline,
                    line,
                }));
                i += 1 + scanned.consumed;
                markup_start = i;
            }
            _ => i += 1,
        }
    }

    push_markup(&mut nodes, &text[markup_start..]);
    Ok(nodes)
}

fn push_markup(nodes: &mut Vec<RawNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(RawNode::Markup(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(RawNode::Markup(text.to_owned()));
    }
}

/// A colon can open an inline invocation unless it continues a word,
/// another colon or an escape.
fn starts_invocation(text: &str, colon: usize) -> bool {
    let follows_word = text[..colon]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == ':' || c == '\\');
    let next_is_upper = text[colon + 1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase());
    !follows_word && next_is_upper
}

/// Index just past the code span starting at `start`, or past the backtick
/// run if it is never closed.
fn skip_code_span(text: &str, start: usize) -> usize {
    let run = backtick_run(&text[start..]);
    let mut pos = start + run;
    while let Some(offset) = text[pos..].find('`') {
        let at = pos + offset;
        let len = backtick_run(&text[at..]);
        if len == run {
            return at + len;
        }
        pos = at + len;
    }
    start + run
}

fn backtick_run(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b'`').count()
}

/// Name, content and attributes of an invocation.
#[derive(Debug)]
struct Scanned {
    name: String,
    content: String,
    attrs: String,
    /// Bytes consumed after the leading colons.
    consumed: usize,
}

/// Scan `Name[content]{attrs}` at the start of `s`.
///
/// Inline invocations need `[` or `{` after the name; block invocations may be bare.
fn scan(s: &str, allow_bare: bool) -> Result<Option<Scanned>, ParseErrorKind> {
    if !s.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return Ok(None);
    }
    let name_end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len());
    let name = &s[..name_end];
    let mut pos = name_end;

    let mut content = "";
    let has_content = s[pos..].starts_with('[');
    if has_content {
        let close = matching(&s[pos..], b'[', b']').ok_or_else(|| ParseErrorKind::UnterminatedContent {
            name: name.to_owned(),
        })?;
        content = &s[pos + 1..pos + close];
        pos += close + 1;
    }

    let mut attrs = "";
    let has_attrs = s[pos..].starts_with('{');
    if has_attrs {
        let close = matching(&s[pos..], b'{', b'}').ok_or_else(|| {
            ParseErrorKind::UnterminatedAttributes {
                name: name.to_owned(),
            }
        })?;
        attrs = &s[pos + 1..pos + close];
        pos += close + 1;
    }

    if !has_content && !has_attrs && !allow_bare {
        return Ok(None);
    }

    Ok(Some(Scanned {
        name: name.to_owned(),
        content: content.to_owned(),
        attrs: attrs.to_owned(),
        consumed: pos,
    }))
}

/// Index of the delimiter closing the one at the start of `s`, respecting
/// nesting, backslash escapes and code spans.
fn matching(s: &str, open: u8, close: u8) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
            continue;
        }
        if b == b'`' {
            i = skip_code_span(s, i);
            continue;
        }
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}
