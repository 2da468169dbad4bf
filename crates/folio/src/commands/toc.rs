//! `folio toc` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_compiler::{AnchorEntry, compile};
use folio_config::CliSettings;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the toc command.
#[derive(Args)]
pub(crate) struct TocArgs {
    /// Article to read.
    file: PathBuf,

    /// Print entries as JSON.
    #[arg(long)]
    json: bool,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl TocArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = super::load_config(self.config.as_deref(), false, CliSettings::default())?;

        let source = super::read_article(&self.file)?;
        let compiled = compile(&source, &config.compile_options()).map_err(|source| CliError::Compile {
            path: self.file.display().to_string(),
            source,
        })?;

        if self.json {
            output.data(&serde_json::to_string_pretty(&compiled.anchors)?);
        } else if compiled.anchors.is_empty() {
            output.info("No anchors");
        } else {
            output.data(&format_toc(&compiled.anchors));
        }
        Ok(())
    }
}

/// One line per entry, headings indented by level below the shallowest.
fn format_toc(anchors: &[AnchorEntry]) -> String {
    let base = anchors.iter().filter_map(AnchorEntry::level).min().unwrap_or(1);
    anchors
        .iter()
        .map(|entry| {
            let depth = entry.level().map_or(0, |level| usize::from(level - base));
            format!("{}{} #{}", "  ".repeat(depth), entry.label, entry.id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
