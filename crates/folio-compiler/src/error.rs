//! Compilation errors.

use folio_frontmatter::FrontmatterError;

use crate::component::ComponentKind;

/// Error returned when an article cannot be compiled.
///
/// Every variant is a deterministic content defect; compiling the same source
/// again fails the same way. Lines are 1-based and relative to the full source
/// (frontmatter included).
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Frontmatter block is present but malformed.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),

    /// Body syntax error.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Invocation names a component kind that is not registered.
    #[error("line {line}: unknown component `{name}` (known components: {})", ComponentKind::names())]
    UnknownComponent {
        /// Name as written in the source.
        name: String,
        /// Source line.
        line: usize,
    },

    /// A required attribute is absent or empty.
    #[error("line {line}: {component} requires attribute `{attribute}`")]
    MissingAttribute {
        /// Component being resolved.
        component: ComponentKind,
        /// Attribute name.
        attribute: &'static str,
        /// Source line.
        line: usize,
    },

    /// An attribute outside the component's contract was supplied.
    #[error("line {line}: {component} does not accept attribute `{attribute}`")]
    UnexpectedAttribute {
        /// Component being resolved.
        component: ComponentKind,
        /// Attribute as written (`#id` and `.class` shorthands included).
        attribute: String,
        /// Source line.
        line: usize,
    },

    /// An attribute value violates the component's contract.
    #[error("line {line}: invalid {component} {attribute}=\"{value}\" (expected {expected})")]
    InvalidAttribute {
        /// Component being resolved.
        component: ComponentKind,
        /// Attribute name.
        attribute: &'static str,
        /// Offending value.
        value: String,
        /// Description of accepted values.
        expected: String,
        /// Source line.
        line: usize,
    },

    /// Child content was given to a component that takes none.
    #[error("line {line}: {component} does not accept child content")]
    UnexpectedChildren {
        /// Component being resolved.
        component: ComponentKind,
        /// Source line.
        line: usize,
    },

    /// A block-only component was written inside a line of text.
    #[error("line {line}: {component} must be written on its own line (`::{component}`)")]
    UnexpectedPlacement {
        /// Component being resolved.
        component: ComponentKind,
        /// Source line.
        line: usize,
    },

    /// Two nodes claim the same anchor identifier.
    #[error("line {line}: anchor id `{id}` is already used on line {first_line}")]
    DuplicateAnchor {
        /// The contested identifier.
        id: String,
        /// Line of the first claim.
        first_line: usize,
        /// Line of the second claim.
        line: usize,
    },
}

impl CompileError {
    /// Source line the error refers to, if known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Frontmatter(FrontmatterError::Yaml { line, .. }) => *line,
            Self::Frontmatter(_) => Some(1),
            Self::Parse(e) => Some(e.line),
            Self::UnknownComponent { line, .. }
            | Self::MissingAttribute { line, .. }
            | Self::UnexpectedAttribute { line, .. }
            | Self::InvalidAttribute { line, .. }
            | Self::UnexpectedChildren { line, .. }
            | Self::UnexpectedPlacement { line, .. }
            | Self::DuplicateAnchor { line, .. } => Some(*line),
        }
    }
}

/// Syntax error in an article body.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// Source line.
    pub line: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// Kinds of body syntax errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// `[` after an invocation name without a matching `]`.
    #[error("content of `{name}` opened with `[` is never closed")]
    UnterminatedContent {
        /// Invocation name.
        name: String,
    },
    /// `{` after an invocation name without a matching `}`.
    #[error("attributes of `{name}` opened with `{{` are never closed")]
    UnterminatedAttributes {
        /// Invocation name.
        name: String,
    },
    /// Container opened but the document ended first.
    #[error("container `{name}` is never closed")]
    UnclosedContainer {
        /// Container name.
        name: String,
    },
    /// Closing marker with no open container.
    #[error("`{marker}` closes nothing (no open container)")]
    StrayClose {
        /// The marker as written.
        marker: String,
    },
    /// Closing marker shorter than the opening one.
    #[error("container `{name}` was opened with {expected} colons but closed with {found}")]
    MismatchedClose {
        /// Container name.
        name: String,
        /// Colons used by the opening marker.
        expected: usize,
        /// Colons used by the closing marker.
        found: usize,
    },
    /// Block invocation followed by other text on the same line.
    #[error("unexpected text after block invocation `{name}`")]
    TrailingContent {
        /// Invocation name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_component_lists_registry() {
        let err = CompileError::UnknownComponent {
            name: "Carousel".to_owned(),
            line: 7,
        };
        let message = err.to_string();
        assert!(message.starts_with("line 7: unknown component `Carousel`"));
        assert!(message.contains("Highlight"));
        assert!(message.contains("DemoButton"));
    }

    #[test]
    fn test_invalid_attribute_message() {
        let err = CompileError::InvalidAttribute {
            component: ComponentKind::Highlight,
            attribute: "color",
            value: "purple".to_owned(),
            expected: "one of yellow, blue, green, red".to_owned(),
            line: 3,
        };
        assert_eq!(
            err.to_string(),
            "line 3: invalid Highlight color=\"purple\" (expected one of yellow, blue, green, red)"
        );
    }

    #[test]
    fn test_parse_error_line() {
        let err = CompileError::from(ParseError {
            line: 12,
            kind: ParseErrorKind::StrayClose {
                marker: ":::".to_owned(),
            },
        });
        assert_eq!(err.line(), Some(12));
        assert_eq!(err.to_string(), "line 12: `:::` closes nothing (no open container)");
    }
}
