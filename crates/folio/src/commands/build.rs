//! `folio build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use folio_compiler::AnchorEntry;
use folio_config::CliSettings;
use folio_frontmatter::Metadata;
use folio_renderer::{PageOptions, RenderedPage, render_page};
use rayon::prelude::*;
use serde::Serialize;

use crate::articles::{self, ArticleRef};
use crate::error::CliError;
use crate::index::{self, IndexEntry};
use crate::output::Output;

const INDEX_FILENAME: &str = "index.json";

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Article source directory (overrides config).
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Commit video players for this viewport width instead of emitting placeholders.
    #[arg(long, value_name = "PX")]
    viewport: Option<u32>,

    /// Fall back to defaults on invalid attribute values instead of failing.
    #[arg(long)]
    lenient: bool,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let settings = CliSettings {
            source_dir: self.source,
            output_dir: self.output,
            ..CliSettings::default()
        };
        let config = super::load_config(self.config.as_deref(), self.lenient, settings)?;
        let source_dir = &config.content_resolved.source_dir;
        let output_dir = &config.build_resolved.output_dir;

        output.info(&format!("Source: {}", source_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let refs = articles::scan(&config.content_resolved);
        if refs.is_empty() {
            output.warning("No articles found");
        }

        let report = build_site(refs, &super::page_options(&config), self.viewport, output_dir)?;

        for (slug, reason) in &report.degraded {
            output.warning(&format!("{slug}: rendered without components"));
            output.detail(&format!("  {reason}"));
        }
        output.success(&format!(
            "Built {} article(s) to {}",
            report.written,
            output_dir.display()
        ));
        Ok(())
    }
}

/// Outcome of a build.
#[derive(Debug, Default)]
pub(crate) struct BuildReport {
    pub written: usize,
    /// Slug and error message of each degraded article.
    pub degraded: Vec<(String, String)>,
}

/// Per-article JSON written next to the HTML.
#[derive(Serialize)]
struct ArticleRecord<'a> {
    slug: &'a str,
    metadata: &'a Metadata,
    anchors: &'a [AnchorEntry],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    warnings: &'a [String],
    degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Render articles in parallel and write their outputs.
pub(crate) fn build_site(
    refs: Vec<ArticleRef>,
    options: &PageOptions,
    viewport: Option<u32>,
    output_dir: &Path,
) -> Result<BuildReport, CliError> {
    let rendered: Vec<(ArticleRef, Result<RenderedPage, CliError>)> = refs
        .into_par_iter()
        .map(|article| {
            let page = super::read_article(&article.path).map(|source| render_page(&source, options, viewport));
            (article, page)
        })
        .collect();

    fs::create_dir_all(output_dir)?;

    let mut report = BuildReport::default();
    let mut entries = Vec::with_capacity(rendered.len());
    for (article, page) in rendered {
        let page = page?;
        write_article(output_dir, &article.slug, &page)?;
        tracing::info!(slug = %article.slug, degraded = page.degraded, "Wrote article");

        if let Some(error) = &page.error {
            report.degraded.push((article.slug.clone(), error.to_string()));
        }
        entries.push(IndexEntry::new(article.slug, &page.metadata, page.degraded));
        report.written += 1;
    }

    index::sort_entries(&mut entries);
    fs::write(output_dir.join(INDEX_FILENAME), serde_json::to_string_pretty(&entries)?)?;

    Ok(report)
}

fn write_article(output_dir: &Path, slug: &str, page: &RenderedPage) -> Result<(), CliError> {
    let html_path = output_dir.join(format!("{slug}.html"));
    if let Some(parent) = html_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&html_path, &page.html)?;

    let record = ArticleRecord {
        slug,
        metadata: &page.metadata,
        anchors: &page.anchors,
        warnings: &page.warnings,
        degraded: page.degraded,
        error: page.error.as_ref().map(ToString::to_string),
    };
    fs::write(
        output_dir.join(format!("{slug}.json")),
        serde_json::to_string_pretty(&record)?,
    )?;
    Ok(())
}
