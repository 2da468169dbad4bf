//! `folio check` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_compiler::{CompileOptions, compile};
use folio_config::CliSettings;
use rayon::prelude::*;

use crate::articles;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Articles to check (default: every article in the source directory).
    files: Vec<PathBuf>,

    /// Report invalid attribute values as warnings instead of errors.
    #[arg(long)]
    lenient: bool,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Result of checking one article.
#[derive(Debug)]
pub(crate) struct CheckOutcome {
    pub path: PathBuf,
    pub result: Result<Vec<String>, CliError>,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = super::load_config(self.config.as_deref(), self.lenient, CliSettings::default())?;

        let files = if self.files.is_empty() {
            articles::scan(&config.content_resolved)
                .into_iter()
                .map(|article| article.path)
                .collect()
        } else {
            self.files
        };

        let outcomes = check_files(files, &config.compile_options());
        let mut failed = 0;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(warnings) => {
                    for warning in warnings {
                        output.warning(&format!("{}: {warning}", outcome.path.display()));
                    }
                }
                Err(err) => {
                    failed += 1;
                    output.error(&err.to_string());
                }
            }
        }

        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} of {} article(s) failed to compile",
                outcomes.len()
            )));
        }
        output.success(&format!("{} article(s) OK", outcomes.len()));
        Ok(())
    }
}

/// Compile every file, keeping input order.
pub(crate) fn check_files(files: Vec<PathBuf>, options: &CompileOptions) -> Vec<CheckOutcome> {
    files
        .into_par_iter()
        .map(|path| {
            let result = super::read_article(&path).and_then(|source| {
                compile(&source, options)
                    .map(|compiled| compiled.warnings)
                    .map_err(|source| CliError::Compile {
                        path: path.display().to_string(),
                        source,
                    })
            });
            CheckOutcome { path, result }
        })
        .collect()
}
