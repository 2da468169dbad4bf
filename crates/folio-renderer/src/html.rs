//! Markdown to HTML5 event renderer.
//!
//! Raw HTML in the input (which is how component markup reaches this stage)
//! passes through untouched; everything else is escaped.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::state::{CodeBlockState, ImageState, TableState};

/// Parser options used for every rendering.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

/// Render markdown to HTML.
pub(crate) fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    HtmlRenderer::new().render(parser)
}

/// Render a markdown fragment meant for inline use, dropping the paragraph
/// wrapper if the whole fragment is a single paragraph.
pub(crate) fn inline_markdown_to_html(markdown: &str) -> String {
    let html = markdown_to_html(markdown.trim());
    match html.strip_prefix("<p>").and_then(|rest| rest.strip_suffix("</p>")) {
        Some(inner) if !inner.contains("<p>") => inner.to_owned(),
        _ => html,
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Streaming HTML renderer over pulldown-cmark events.
#[derive(Debug, Default)]
pub(crate) struct HtmlRenderer {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
}

impl HtmlRenderer {
    pub(crate) fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            ..Self::default()
        }
    }

    pub(crate) fn render<'a, I>(mut self, events: I) -> String
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }
        self.output
    }

    fn process_event(&mut self, event: Event<'_>) {
        if self.image.is_active() {
            // Everything up to the end of the image is alt text.
            match event {
                Event::End(TagEnd::Image) => self.end_tag(TagEnd::Image),
                Event::Text(text) | Event::Code(text) => self.image.push_str(&text),
                Event::SoftBreak | Event::HardBreak => self.image.push_str(" "),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let _ = write!(self.output, "<code>{}</code>", escape_html(&code));
            }
            Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
            Event::SoftBreak => self.output.push('\n'),
            Event::HardBreak => self.output.push_str("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => {
                self.output.push_str(if checked {
                    r#"<input type="checkbox" checked disabled> "#
                } else {
                    r#"<input type="checkbox" disabled> "#
                });
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading {
                level, id, classes, ..
            } => {
                let _ = write!(self.output, "<h{}", heading_level(level));
                if let Some(id) = id {
                    let _ = write!(self.output, r#" id="{}""#, escape_html(&id));
                }
                if !classes.is_empty() {
                    let classes: Vec<_> = classes.iter().map(|c| escape_html(c)).collect();
                    let _ = write!(self.output, r#" class="{}""#, classes.join(" "));
                }
                self.output.push('>');
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|lang| !lang.is_empty())
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>"),
            Tag::List(Some(start)) => {
                let _ = write!(self.output, r#"<ol start="{start}">"#);
            }
            Tag::List(None) => self.output.push_str("<ul>"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                let _ = write!(self.output, "<{tag}{align}>");
            }
            Tag::Emphasis => self.output.push_str("<em>"),
            Tag::Strong => self.output.push_str("<strong>"),
            Tag::Strikethrough => self.output.push_str("<s>"),
            Tag::Superscript => self.output.push_str("<sup>"),
            Tag::Subscript => self.output.push_str("<sub>"),
            Tag::Link { dest_url, title, .. } => {
                let _ = write!(self.output, r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    let _ = write!(self.output, r#" title="{}""#, escape_html(&title));
                }
                self.output.push('>');
            }
            Tag::Image {
                dest_url, title, ..
            } => self.image.start(dest_url.into_string(), title.into_string()),
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(level) => {
                let _ = write!(self.output, "</h{}>", heading_level(level));
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                match lang {
                    Some(lang) => {
                        let _ = write!(
                            self.output,
                            r#"<pre><code class="language-{}">{}</code></pre>"#,
                            escape_html(&lang),
                            escape_html(&content)
                        );
                    }
                    None => {
                        let _ = write!(self.output, "<pre><code>{}</code></pre>", escape_html(&content));
                    }
                }
            }
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() { "</th>" } else { "</td>" });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.output.push_str("</em>"),
            TagEnd::Strong => self.output.push_str("</strong>"),
            TagEnd::Strikethrough => self.output.push_str("</s>"),
            TagEnd::Superscript => self.output.push_str("</sup>"),
            TagEnd::Subscript => self.output.push_str("</sub>"),
            TagEnd::Link => self.output.push_str("</a>"),
            TagEnd::Image => {
                if let Some((src, title, alt)) = self.image.end() {
                    let _ = write!(self.output, r#"<img src="{}""#, escape_html(&src));
                    if !title.is_empty() {
                        let _ = write!(self.output, r#" title="{}""#, escape_html(&title));
                    }
                    let _ = write!(self.output, r#" alt="{}">"#, escape_html(&alt));
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_paragraph() {
        assert_eq!(markdown_to_html("Hello, world!"), "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_with_attribute_id() {
        assert_eq!(
            markdown_to_html("## Getting started {#start}"),
            r#"<h2 id="start">Getting started</h2>"#
        );
    }

    #[test]
    fn test_heading_without_id() {
        assert_eq!(markdown_to_html("### Plain"), "<h3>Plain</h3>");
    }

    #[test]
    fn test_code_block_is_escaped() {
        assert_eq!(
            markdown_to_html("```html\n<b>x</b>\n```"),
            "<pre><code class=\"language-html\">&lt;b&gt;x&lt;/b&gt;\n</code></pre>"
        );
    }

    #[test]
    fn test_inline_formatting() {
        let html = markdown_to_html("*italic* **bold** ~~gone~~ `code`");
        assert_eq!(
            html,
            "<p><em>italic</em> <strong>bold</strong> <s>gone</s> <code>code</code></p>"
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = markdown_to_html(r#"This is <span class="x">marked</span> text."#);
        assert_eq!(html, r#"<p>This is <span class="x">marked</span> text.</p>"#);
    }

    #[test]
    fn test_image_alt_text() {
        assert_eq!(
            markdown_to_html("![A *tree*](tree.png)"),
            r#"<p><img src="tree.png" alt="A tree"></p>"#
        );
    }

    #[test]
    fn test_table() {
        let html = markdown_to_html("| A | B |\n|:-:|---|\n| 1 | 2 |");
        assert!(html.contains(r#"<th style="text-align:center">A</th>"#), "{html}");
        assert!(html.contains("<tbody><tr><td style=\"text-align:center\">1</td><td>2</td></tr>"), "{html}");
    }

    #[test]
    fn test_task_list() {
        let html = markdown_to_html("- [x] done\n- [ ] todo");
        assert!(html.contains(r#"<input type="checkbox" checked disabled> done"#));
        assert!(html.contains(r#"<input type="checkbox" disabled> todo"#));
    }

    #[test]
    fn test_ordered_list_start() {
        assert_eq!(markdown_to_html("3. three\n4. four"), r#"<ol start="3"><li>three</li><li>four</li></ol>"#);
    }

    #[test]
    fn test_inline_fragment_drops_paragraph() {
        assert_eq!(inline_markdown_to_html("Go *now*"), "Go <em>now</em>");
        assert_eq!(inline_markdown_to_html("a\n\nb"), "<p>a</p><p>b</p>");
        assert_eq!(inline_markdown_to_html(""), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;");
    }
}
