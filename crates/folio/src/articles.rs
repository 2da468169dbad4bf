//! Article discovery by filesystem walking.

use std::fs;
use std::path::{Path, PathBuf};

use folio_config::ContentConfig;

/// An article source file and the slug its outputs are named after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArticleRef {
    /// Path relative to the source directory, without extension, `/`-separated.
    pub slug: String,
    pub path: PathBuf,
}

/// Find every article under the content source directory, sorted by slug.
///
/// Hidden files and directories are skipped. A missing source directory
/// yields no articles.
pub(crate) fn scan(content: &ContentConfig) -> Vec<ArticleRef> {
    let mut refs = Vec::new();
    if content.source_dir.exists() {
        scan_directory(content, &content.source_dir, "", &mut refs);
    }
    refs.sort_by(|a, b| a.slug.cmp(&b.slug));
    refs
}

fn scan_directory(content: &ContentConfig, dir_path: &Path, slug_prefix: &str, refs: &mut Vec<ArticleRef>) {
    let Ok(entries) = fs::read_dir(dir_path) else {
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            scan_directory(content, &path, &join_slug(slug_prefix, &name), refs);
        } else if content.is_article(&path) {
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            refs.push(ArticleRef {
                slug: join_slug(slug_prefix, &stem),
                path,
            });
        }
    }
}

/// Slug for a file given explicitly on the command line.
pub(crate) fn slug_for(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "article".to_owned(), |s| s.to_string_lossy().into_owned())
}

fn join_slug(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}
