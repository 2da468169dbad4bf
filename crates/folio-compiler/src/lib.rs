//! Article compiler.
//!
//! Turns article source (frontmatter plus markdown with embedded component
//! invocations) into a [`CompiledDocument`] and an ordered anchor index.
//!
//! # Example
//!
//! ```
//! use folio_compiler::{compile, CompileOptions};
//!
//! let source = "---\ntitle: Arboretum\n---\n::TitleSection\n\n## Growth\n\nTrees :Highlight[grow]{color=green}.\n";
//! let compiled = compile(source, &CompileOptions::default()).unwrap();
//!
//! let ids: Vec<_> = compiled.anchors.iter().map(|a| a.id.as_str()).collect();
//! assert_eq!(ids, ["overview", "growth"]);
//! ```
//!
//! Compilation is pure: no I/O, no shared state. Documents can be compiled in
//! parallel.

mod anchors;
mod component;
mod error;
mod options;
mod resolve;
pub mod syntax;
mod text;
mod tree;

use folio_frontmatter::Metadata;

pub use anchors::{AnchorEntry, AnchorSource, OVERVIEW_ID, slugify};
pub use component::{
    CalloutKind, Component, ComponentKind, HighlightColor, TitleBlock, VideoPlayer,
};
pub use error::{CompileError, ParseError, ParseErrorKind};
pub use options::{AttributePolicy, CompileOptions};
pub use tree::{Compiled, CompiledDocument, ComponentNode, Heading, Node, Placement};

use resolve::Resolver;

/// Compile a complete article source, frontmatter included.
///
/// # Errors
///
/// Returns an error on malformed frontmatter, body syntax errors, unknown
/// components, attribute contract violations and anchor id collisions.
pub fn compile(source: &str, options: &CompileOptions) -> Result<Compiled, CompileError> {
    let split = folio_frontmatter::split(source)?;
    compile_at(split.body, split.metadata, options, split.body_line)
}

/// Compile a body whose metadata was parsed separately.
///
/// Reported lines are relative to `body`.
///
/// # Errors
///
/// Same as [`compile`], minus frontmatter errors.
pub fn compile_body(body: &str, metadata: Metadata, options: &CompileOptions) -> Result<Compiled, CompileError> {
    compile_at(body, metadata, options, 1)
}

fn compile_at(
    body: &str,
    metadata: Metadata,
    options: &CompileOptions,
    first_line: usize,
) -> Result<Compiled, CompileError> {
    let raw = syntax::parse(body, first_line)?;

    let mut resolver = Resolver::new(&metadata, options.attribute_policy);
    let mut nodes = resolver.resolve(raw)?;
    let video_players = resolver.video_players();
    let warnings = resolver.into_warnings();

    let anchors = anchors::assign(&mut nodes, options)?;

    tracing::debug!(
        nodes = nodes.len(),
        anchors = anchors.len(),
        video_players,
        warnings = warnings.len(),
        "Compiled article"
    );

    Ok(Compiled {
        metadata,
        document: CompiledDocument::new(nodes, video_players),
        anchors,
        warnings,
    })
}
