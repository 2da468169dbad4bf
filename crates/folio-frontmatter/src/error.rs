//! Frontmatter error type.

/// Error returned when a frontmatter block is present but malformed.
///
/// Every variant records where the body most likely begins, so callers can
/// keep displaying the article even when its header is broken.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// Opening `---` without a matching closing line.
    #[error("frontmatter opened on line 1 is never closed (expected a `---` line)")]
    Unterminated {
        /// Byte offset of the guessed body start.
        body_offset: usize,
    },
    /// Header content is not valid YAML or has an ill-typed field.
    #[error("{}", yaml_message(message, *line))]
    Yaml {
        /// Parser message.
        message: String,
        /// 1-based source line of the problem, if known.
        line: Option<usize>,
        /// Byte offset of the body start.
        body_offset: usize,
    },
    /// Header is valid YAML but not a key/value mapping.
    #[error("frontmatter must be a mapping of keys to values")]
    NotAMapping {
        /// Byte offset of the body start.
        body_offset: usize,
    },
}

fn yaml_message(message: &str, line: Option<usize>) -> String {
    match line {
        Some(line) => format!("invalid frontmatter on line {line}: {message}"),
        None => format!("invalid frontmatter: {message}"),
    }
}

impl FrontmatterError {
    /// Byte offset where the body most likely starts.
    #[must_use]
    pub fn body_offset(&self) -> usize {
        match self {
            Self::Unterminated { body_offset }
            | Self::Yaml { body_offset, .. }
            | Self::NotAMapping { body_offset } => *body_offset,
        }
    }

    /// Body text of `source` according to best-effort boundary detection.
    ///
    /// `source` must be the text the error was produced from.
    #[must_use]
    pub fn best_effort_body<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.body_offset()..).unwrap_or(source)
    }

    /// Replace the recorded body offset.
    ///
    /// Metadata parsing happens on the header slice alone; the splitter fills
    /// in the real offset afterwards.
    pub(crate) fn with_body_offset(self, offset: usize) -> Self {
        match self {
            Self::Unterminated { .. } => Self::Unterminated {
                body_offset: offset,
            },
            Self::Yaml { message, line, .. } => Self::Yaml {
                message,
                // Header content starts on line 2 of the source.
                line: line.map(|l| l + 1),
                body_offset: offset,
            },
            Self::NotAMapping { .. } => Self::NotAMapping {
                body_offset: offset,
            },
        }
    }
}
