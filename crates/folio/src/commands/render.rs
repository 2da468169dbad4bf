//! `folio render` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::CliSettings;
use folio_renderer::render_page;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Article to render.
    file: PathBuf,

    /// Commit video players for this viewport width.
    #[arg(long, value_name = "PX")]
    viewport: Option<u32>,

    /// Fall back to defaults on invalid attribute values instead of failing.
    #[arg(long)]
    lenient: bool,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = super::load_config(self.config.as_deref(), self.lenient, CliSettings::default())?;

        let source = super::read_article(&self.file)?;
        let page = render_page(&source, &super::page_options(&config), self.viewport);

        for warning in &page.warnings {
            output.warning(warning);
        }
        if let Some(error) = &page.error {
            output.warning(&format!(
                "{}: rendered without components: {error}",
                self.file.display()
            ));
        }
        output.data(&page.html);
        Ok(())
    }
}
