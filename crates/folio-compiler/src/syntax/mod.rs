//! Article body syntax.
//!
//! Components are embedded in markdown with directive-style invocations:
//!
//! - Inline: `:Kind[content]{attrs}`
//! - Block (leaf): `::Kind[content]{attrs}` on its own line
//! - Block (container): `:::Kind{attrs}` ... `:::`
//!
//! Kind names start with an uppercase ASCII letter, which keeps ordinary prose
//! such as `12:30` or `note:` from being mistaken for an invocation.

mod args;
mod blocks;
mod parser;

pub use args::InvocationArgs;
pub(crate) use parser::{Invocation, RawHeading, RawNode, parse};
