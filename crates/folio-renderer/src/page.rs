//! Full article pipeline: split, compile, view, HTML.

use folio_compiler::{AnchorEntry, CompileError, CompileOptions, compile};
use folio_frontmatter::Metadata;
use serde::{Serialize, Serializer};

use crate::render_plain;
use crate::view::{Presentation, View};

/// Options for [`render_page`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageOptions {
    pub compile: CompileOptions,
    pub presentation: Presentation,
}

/// A rendered article.
#[derive(Debug, Serialize)]
pub struct RenderedPage {
    /// Article HTML.
    pub html: String,
    /// Article metadata. Empty when the header could not be read.
    pub metadata: Metadata,
    /// Table-of-contents entries in document order.
    pub anchors: Vec<AnchorEntry>,
    /// Lenient-policy fallbacks applied during compilation.
    pub warnings: Vec<String>,
    /// `true` when compilation failed and `html` is the plain rendering.
    pub degraded: bool,
    /// The error that caused degradation.
    #[serde(serialize_with = "serialize_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<CompileError>,
}

#[allow(clippy::ref_option)] // serde passes the field by reference
fn serialize_error<S: Serializer>(error: &Option<CompileError>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Render an article source to HTML.
///
/// With a viewport width, video players are committed for that width;
/// without one they render placeholders. Never fails: any compile error
/// degrades the page to a plain rendering of the body.
#[must_use]
pub fn render_page(source: &str, options: &PageOptions, viewport: Option<u32>) -> RenderedPage {
    match compile(source, &options.compile) {
        Ok(compiled) => {
            let view = View::new(&compiled.document, options.presentation);
            if let Some(width) = viewport {
                view.observe_viewport(width);
            }
            let html = view.render();
            RenderedPage {
                html,
                metadata: compiled.metadata,
                anchors: compiled.anchors,
                warnings: compiled.warnings,
                degraded: false,
                error: None,
            }
        }
        Err(error) => {
            tracing::warn!(error = %error, "Article compilation failed, rendering plain");
            let (metadata, body) = match folio_frontmatter::split(source) {
                Ok(split) => (split.metadata, split.body),
                Err(frontmatter) => (Metadata::default(), frontmatter.best_effort_body(source)),
            };
            RenderedPage {
                html: render_plain(body),
                metadata,
                anchors: Vec::new(),
                warnings: Vec::new(),
                degraded: true,
                error: Some(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_compiler::AttributePolicy;

    use super::*;

    #[test]
    fn test_render_page() {
        let source = "---\ntitle: Case Study\npublished: 2024-03-04\n---\n::TitleSection\n\n## Approach\n\nText.\n";
        let page = render_page(source, &PageOptions::default(), None);
        assert!(!page.degraded);
        assert!(page.error.is_none());
        assert_eq!(page.metadata.title.as_deref(), Some("Case Study"));
        assert!(page.html.contains("Case Study</h1>"), "{}", page.html);
        assert!(page.html.contains("March 4, 2024"), "{}", page.html);
        let ids: Vec<_> = page.anchors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["overview", "approach"]);
    }

    #[test]
    fn test_invalid_color_degrades() {
        let source = "---\ntitle: T\n---\nSee :Highlight[this]{color=purple}.\n";
        let page = render_page(source, &PageOptions::default(), None);
        assert!(page.degraded);
        assert!(matches!(page.error, Some(CompileError::InvalidAttribute { .. })));
        assert_eq!(page.metadata.title.as_deref(), Some("T"));
        assert_eq!(page.html, "<p>See :Highlight[this]{color=purple}.</p>");
        assert!(page.anchors.is_empty());
    }

    #[test]
    fn test_invalid_color_lenient() {
        let source = "See :Highlight[this]{color=purple}.\n";
        let options = PageOptions {
            compile: CompileOptions::default().with_attribute_policy(AttributePolicy::Lenient),
            ..PageOptions::default()
        };
        let page = render_page(source, &options, None);
        assert!(!page.degraded);
        assert_eq!(page.warnings.len(), 1);
        assert!(page.html.contains("bg-yellow-200"), "{}", page.html);
    }

    #[test]
    fn test_malformed_header_degrades() {
        let source = "---\ntitle: [unclosed\n---\nBody text.\n";
        let page = render_page(source, &PageOptions::default(), None);
        assert!(page.degraded);
        assert!(matches!(page.error, Some(CompileError::Frontmatter(_))));
        assert!(page.metadata.title.is_none());
        assert_eq!(page.html, "<p>Body text.</p>");
    }

    #[test]
    fn test_viewport_is_observed() {
        let source = "::VideoPlayer{width=640 height=360 videoUrl=/v.mp4 gifUrl=/v.gif}\n";
        let page = render_page(source, &PageOptions::default(), Some(400));
        assert!(page.html.contains(r#"<img src="/v.gif""#), "{}", page.html);
    }

    #[test]
    fn test_page_json() {
        let page = render_page("Oops :Nope[x]\n", &PageOptions::default(), None);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["degraded"], true);
        assert!(json["error"].as_str().unwrap().contains("Nope"));
    }
}
