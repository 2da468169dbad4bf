//! HTML rendering for compiled articles.
//!
//! Rendering happens in two stages. A [`View`] writes the compiled document
//! back out as markdown, with component markup inlined as raw HTML and
//! heading ids attached as attributes. A pulldown-cmark event renderer then
//! turns that markdown into HTML5.
//!
//! Video players are presentation-time components: each [`View`] commits a
//! video-or-image choice per player on the first observed viewport.
//!
//! # Example
//!
//! ```
//! use folio_compiler::{CompileOptions, compile};
//! use folio_renderer::{Presentation, View};
//!
//! let compiled = compile("## Intro\n\nHello :Highlight[world]{color=green}!\n", &CompileOptions::default())?;
//! let view = View::new(&compiled.document, Presentation::default());
//! view.observe_viewport(1280);
//! let html = view.render();
//! assert!(html.starts_with(r#"<h2 id="intro">Intro</h2>"#));
//! # Ok::<(), folio_compiler::CompileError>(())
//! ```

mod components;
mod html;
mod page;
mod state;
mod view;

pub use html::escape_html;
pub use page::{PageOptions, RenderedPage, render_page};
pub use view::{DEFAULT_VIDEO_BREAKPOINT, MediaChoice, Presentation, View};

/// Render markdown without any component processing.
///
/// Directive text is kept verbatim.
#[must_use]
pub fn render_plain(markdown: &str) -> String {
    html::markdown_to_html(markdown)
}
