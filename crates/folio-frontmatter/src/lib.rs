//! Frontmatter splitting for article sources.
//!
//! An article may start with a YAML header fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Case Study
//! date: 2024-03-04
//! ---
//!
//! Body text...
//! ```
//!
//! [`split`] separates the header from the body and parses it into a typed
//! [`Metadata`] record. A missing header is not an error: the whole input is
//! the body and the metadata is empty. A header that is present but broken
//! yields a [`FrontmatterError`], which still knows where the body most likely
//! starts (see [`FrontmatterError::best_effort_body`]).
//!
//! # Example
//!
//! ```
//! use folio_frontmatter::split;
//!
//! let source = "---\ntitle: Case Study\ndate: 2024-03-04\n---\nHello";
//! let split = split(source).unwrap();
//!
//! assert_eq!(split.metadata.title.as_deref(), Some("Case Study"));
//! assert_eq!(
//!     split.metadata.effective_date().map(ToString::to_string),
//!     Some("March 4, 2024".to_owned())
//! );
//! assert_eq!(split.body, "Hello");
//! ```

mod date;
mod error;
mod metadata;

pub use date::DateValue;
pub use error::FrontmatterError;
pub use metadata::Metadata;

/// Opening and closing delimiter of a frontmatter block.
const DELIMITER: &str = "---";

/// Alternative closing delimiter (YAML document end marker).
const END_MARKER: &str = "...";

/// Result of splitting an article source.
#[derive(Clone, Debug, PartialEq)]
pub struct Split<'a> {
    /// Parsed metadata (empty when the source has no frontmatter).
    pub metadata: Metadata,
    /// Body text following the frontmatter block.
    pub body: &'a str,
    /// Whether a frontmatter block was present.
    pub has_frontmatter: bool,
    /// 1-based line number of the first body line within the source.
    pub body_line: usize,
}

/// Split an article source into metadata and body.
///
/// # Errors
///
/// Returns [`FrontmatterError`] if the source opens a frontmatter block that is
/// never closed, or whose content is not a valid YAML mapping.
pub fn split(source: &str) -> Result<Split<'_>, FrontmatterError> {
    let Some(header) = locate(source) else {
        return Ok(Split {
            metadata: Metadata::default(),
            body: source,
            has_frontmatter: false,
            body_line: 1,
        });
    };

    let Some(close) = header.close else {
        let body_offset = best_effort_offset(source, header.content_start);
        tracing::debug!(body_offset, "unterminated frontmatter");
        return Err(FrontmatterError::Unterminated { body_offset });
    };

    let yaml = &source[header.content_start..close.start];
    let metadata = Metadata::from_yaml(yaml).map_err(|e| e.with_body_offset(close.end))?;

    Ok(Split {
        metadata,
        body: &source[close.end..],
        has_frontmatter: true,
        body_line: close.line + 1,
    })
}

/// Location of a frontmatter block within a source.
struct Header {
    /// Byte offset where the YAML content starts (after the opening line).
    content_start: usize,
    /// Closing delimiter, if found.
    close: Option<Close>,
}

/// Location of the closing delimiter line.
struct Close {
    /// Byte offset of the closing line.
    start: usize,
    /// Byte offset just past the closing line (including its newline).
    end: usize,
    /// 1-based line number of the closing line.
    line: usize,
}

/// Find the frontmatter block at the start of the source, if any.
fn locate(source: &str) -> Option<Header> {
    let bom = if source.starts_with('\u{feff}') { 3 } else { 0 };
    let rest = &source[bom..];

    let first_end = rest.find('\n').map_or(rest.len(), |i| i + 1);
    if rest[..first_end].trim_end() != DELIMITER {
        return None;
    }

    let content_start = bom + first_end;
    let mut offset = content_start;
    let mut line = 2;

    for raw in source[content_start..].split_inclusive('\n') {
        let trimmed = raw.trim_end();
        if trimmed == DELIMITER || trimmed == END_MARKER {
            return Some(Header {
                content_start,
                close: Some(Close {
                    start: offset,
                    end: offset + raw.len(),
                    line,
                }),
            });
        }
        offset += raw.len();
        line += 1;
    }

    Some(Header {
        content_start,
        close: None,
    })
}

/// Guess where the body starts when the closing delimiter is missing.
///
/// The first blank line after the opening delimiter is taken as the end of
/// the header. Without one, the whole source is treated as body.
fn best_effort_offset(source: &str, content_start: usize) -> usize {
    let mut offset = content_start;
    for raw in source[content_start..].split_inclusive('\n') {
        offset += raw.len();
        if raw.trim().is_empty() {
            return offset;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_no_frontmatter() {
        let result = split("# Hello\n\nWorld").unwrap();
        assert!(!result.has_frontmatter);
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "# Hello\n\nWorld");
        assert_eq!(result.body_line, 1);
    }

    #[test]
    fn test_empty_source() {
        let result = split("").unwrap();
        assert!(!result.has_frontmatter);
        assert_eq!(result.body, "");
    }

    #[test]
    fn test_basic_frontmatter() {
        let source = "---\ntitle: Case Study\nsubtitle: A deep dive\n---\nBody\n";
        let result = split(source).unwrap();

        assert!(result.has_frontmatter);
        assert_eq!(result.metadata.title.as_deref(), Some("Case Study"));
        assert_eq!(result.metadata.subtitle.as_deref(), Some("A deep dive"));
        assert_eq!(result.body, "Body\n");
        assert_eq!(result.body_line, 5);
    }

    #[test]
    fn test_body_is_unchanged() {
        let source = "---\ntitle: T\n---\n\n  indented\n---\nmore";
        let result = split(source).unwrap();
        assert_eq!(result.body, "\n  indented\n---\nmore");
    }

    #[test]
    fn test_empty_frontmatter() {
        let result = split("---\n---\nBody").unwrap();
        assert!(result.has_frontmatter);
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn test_dots_close_frontmatter() {
        let result = split("---\ntitle: T\n...\nBody").unwrap();
        assert_eq!(result.metadata.title.as_deref(), Some("T"));
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn test_crlf_line_endings() {
        let result = split("---\r\ntitle: T\r\n---\r\nBody").unwrap();
        assert_eq!(result.metadata.title.as_deref(), Some("T"));
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn test_byte_order_mark() {
        let result = split("\u{feff}---\ntitle: T\n---\nBody").unwrap();
        assert_eq!(result.metadata.title.as_deref(), Some("T"));
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn test_delimiter_not_at_start_is_body() {
        let source = "Intro\n---\ntitle: T\n---\n";
        let result = split(source).unwrap();
        assert!(!result.has_frontmatter);
        assert_eq!(result.body, source);
    }

    #[test]
    fn test_longer_rule_is_not_delimiter() {
        let source = "----\ntitle: T\n----\n";
        let result = split(source).unwrap();
        assert!(!result.has_frontmatter);
    }

    #[test]
    fn test_date_is_date_like() {
        let result = split("---\ntitle: Case Study\ndate: 2024-03-04\n---\n").unwrap();
        let date = result.metadata.effective_date().unwrap();
        assert!(date.as_date().is_some());
        assert_eq!(date.to_string(), "March 4, 2024");
    }

    #[test]
    fn test_unterminated_is_error() {
        let source = "---\ntitle: T\n\nBody text";
        let err = split(source).unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated { .. }));
        assert_eq!(err.best_effort_body(source), "Body text");
    }

    #[test]
    fn test_unterminated_without_blank_line_keeps_everything() {
        let source = "---\ntitle: T";
        let err = split(source).unwrap_err();
        assert_eq!(err.best_effort_body(source), source);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let source = "---\ntitle: [unclosed\n---\nBody";
        let err = split(source).unwrap_err();
        assert!(matches!(err, FrontmatterError::Yaml { .. }));
        assert_eq!(err.best_effort_body(source), "Body");
    }

    #[test]
    fn test_yaml_error_reports_source_line() {
        let source = "---\ntitle: ok\nsubtitle: [unclosed\n---\nBody";
        let err = split(source).unwrap_err();
        let FrontmatterError::Yaml { line, .. } = err else {
            panic!("expected yaml error");
        };
        assert!(line.is_some_and(|l| l >= 3), "line was {line:?}");
    }

    #[test]
    fn test_non_mapping_is_error() {
        let source = "---\n- a\n- b\n---\nBody";
        let err = split(source).unwrap_err();
        assert!(matches!(err, FrontmatterError::NotAMapping { .. }));
        assert_eq!(err.best_effort_body(source), "Body");
    }

    #[test]
    fn test_canonical_round_trip() {
        let source = "---\ntitle: Case Study\nsubtitle: 'Notes: part 1'\npublished: 2024-03-04\nyear: 2023\nlocation: Berlin\ntags:\n  - rust\n  - web\n---\nBody";
        let first = split(source).unwrap();

        let canonical = first.metadata.to_frontmatter().unwrap();
        let reparsed = split(&canonical).unwrap();

        assert_eq!(reparsed.metadata, first.metadata);
        assert_eq!(reparsed.metadata.to_frontmatter().unwrap(), canonical);
    }
}
