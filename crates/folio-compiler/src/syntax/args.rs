//! Invocation argument parsing.
//!
//! Parses the `[content]{#id .class key="value"}` part of an invocation.

use std::collections::BTreeMap;

/// Arguments supplied to a component invocation.
///
/// `:Kind[content]{#id .class key="value"}`
///
/// # Example
///
/// ```
/// use folio_compiler::syntax::InvocationArgs;
///
/// let args = InvocationArgs::parse("hello", r#"#my-id .foo color="blue""#);
/// assert_eq!(args.content, "hello");
/// assert_eq!(args.id.as_deref(), Some("my-id"));
/// assert_eq!(args.classes, vec!["foo"]);
/// assert_eq!(args.get("color"), Some("blue"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvocationArgs {
    /// Raw bracket content: `[content]` (empty if not provided).
    pub content: String,
    /// ID shorthand: `{#id}`.
    pub id: Option<String>,
    /// Class shorthands: `{.class1 .class2}`.
    pub classes: Vec<String>,
    /// Key-value attributes: `{key="value"}`.
    pub attrs: BTreeMap<String, String>,
}

impl InvocationArgs {
    /// Parse bracket content and an attribute string (without braces).
    #[must_use]
    pub fn parse(content: &str, attrs_str: &str) -> Self {
        let mut args = Self {
            content: content.to_owned(),
            ..Default::default()
        };

        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            remaining = remaining.trim_start();

            if let Some(rest) = remaining.strip_prefix('#') {
                let end = shorthand_end(rest);
                args.id = Some(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let end = shorthand_end(rest);
                args.classes.push(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                args.attrs.insert(key.to_owned(), value.to_owned());
                remaining = rest;
            } else {
                // Skip unrecognized character
                let skip = remaining.chars().next().map_or(1, char::len_utf8);
                remaining = &remaining[skip..];
            }
        }

        args
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Names of every supplied attribute, shorthands included (`#id`, `.class`).
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.id
            .iter()
            .map(|id| format!("#{id}"))
            .chain(self.classes.iter().map(|c| format!(".{c}")))
            .chain(self.attrs.keys().cloned())
    }
}

/// Length of an `#id` or `.class` shorthand.
fn shorthand_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse a key-value pair: `key="value"`, `key='value'` or `key=value`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();

    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    for quote in ['"', '\''] {
        if let Some(stripped) = after_eq.strip_prefix(quote) {
            let end_quote = stripped.find(quote)?;
            return Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]));
        }
    }

    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
    Some((key, &after_eq[..end], &after_eq[end..]))
}
