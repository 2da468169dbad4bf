//! CLI command implementations.

mod build;
mod check;
mod render;
mod toc;

use std::path::Path;

use folio_compiler::AttributePolicy;
use folio_config::{CliSettings, Config};
use folio_renderer::{PageOptions, Presentation};

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;
pub(crate) use toc::TocArgs;

use crate::error::CliError;

/// Load configuration, turning `--lenient` into a policy override.
fn load_config(config: Option<&Path>, lenient: bool, mut settings: CliSettings) -> Result<Config, CliError> {
    if lenient {
        settings.attribute_policy = Some(AttributePolicy::Lenient);
    }
    Ok(Config::load(config, Some(&settings))?)
}

fn page_options(config: &Config) -> PageOptions {
    PageOptions {
        compile: config.compile_options(),
        presentation: Presentation {
            video_breakpoint: config.presentation.video_breakpoint,
        },
    }
}

fn read_article(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })
}
