//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `content.source_dir`
//! - `build.output_dir`

mod expand;

use std::path::{Path, PathBuf};

use folio_compiler::{AttributePolicy, CompileOptions};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override article source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override attribute policy.
    pub attribute_policy: Option<AttributePolicy>,
    /// Override video breakpoint.
    pub video_breakpoint: Option<u32>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

const DEFAULT_SOURCE_DIR: &str = "articles";
const DEFAULT_OUTPUT_DIR: &str = "dist";
const DEFAULT_VIDEO_BREAKPOINT: u32 = 768;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,
    /// Compiler settings.
    pub compiler: CompilerConfig,
    /// Presentation settings.
    pub presentation: PresentationConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    extensions: Option<Vec<String>>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory searched for articles.
    pub source_dir: PathBuf,
    /// Article file extensions, without the dot.
    pub extensions: Vec<String>,
}

impl ContentConfig {
    /// Whether a path has one of the article extensions.
    #[must_use]
    pub fn is_article(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    output_dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory receiving rendered pages.
    pub output_dir: PathBuf,
}

/// Compiler configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Handling of unknown enumerated attribute values.
    pub attribute_policy: AttributePolicy,
    /// Whether headings produce table-of-contents entries.
    pub heading_anchors: bool,
    /// Lowest and highest heading level listed.
    pub toc_levels: [u8; 2],
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            attribute_policy: AttributePolicy::Strict,
            heading_anchors: true,
            toc_levels: [2, 3],
        }
    }
}

/// Presentation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Viewport width from which video players show video.
    pub video_breakpoint: u32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            video_breakpoint: DEFAULT_VIDEO_BREAKPOINT,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.output_dir`").
        field: String,
        /// Error message (e.g., "${`SITE_ROOT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>, cli_settings: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir().ok().and_then(|cwd| Self::discover_from(&cwd)) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Compile options described by the `[compiler]` section.
    #[must_use]
    pub fn compile_options(&self) -> CompileOptions {
        let [min, max] = self.compiler.toc_levels;
        CompileOptions::default()
            .with_attribute_policy(self.compiler.attribute_policy)
            .with_heading_anchors(self.compiler.heading_anchors)
            .with_toc_levels(min..=max)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(policy) = settings.attribute_policy {
            self.compiler.attribute_policy = policy;
        }
        if let Some(breakpoint) = settings.video_breakpoint {
            self.presentation.video_breakpoint = breakpoint;
        }
    }

    /// Search for a config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            build: BuildConfigRaw::default(),
            compiler: CompilerConfig::default(),
            presentation: PresentationConfig::default(),
            content_resolved: ContentConfig {
                source_dir: base.join(DEFAULT_SOURCE_DIR),
                extensions: default_extensions(),
            },
            build_resolved: BuildConfig {
                output_dir: base.join(DEFAULT_OUTPUT_DIR),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.presentation.video_breakpoint == 0 {
            return Err(ConfigError::Validation(
                "presentation.video_breakpoint must be greater than 0".to_owned(),
            ));
        }

        let [min, max] = self.compiler.toc_levels;
        if !(1..=6).contains(&min) || !(1..=6).contains(&max) {
            return Err(ConfigError::Validation(
                "compiler.toc_levels must be heading levels between 1 and 6".to_owned(),
            ));
        }
        if min > max {
            return Err(ConfigError::Validation(format!(
                "compiler.toc_levels lower bound {min} exceeds upper bound {max}"
            )));
        }

        if self.content_resolved.extensions.is_empty() {
            return Err(ConfigError::Validation("content.extensions cannot be empty".to_owned()));
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.content.source_dir {
            self.content.source_dir = Some(expand::expand_env(dir, "content.source_dir")?);
        }
        if let Some(ref dir) = self.build.output_dir {
            self.build.output_dir = Some(expand::expand_env(dir, "build.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content_resolved = ContentConfig {
            source_dir: resolve(self.content.source_dir.as_deref(), DEFAULT_SOURCE_DIR),
            extensions: self
                .content
                .extensions
                .iter()
                .flatten()
                .map(|ext| ext.trim_start_matches('.').to_owned())
                .collect(),
        };
        if self.content.extensions.is_none() {
            self.content_resolved.extensions = default_extensions();
        }

        self.build_resolved = BuildConfig {
            output_dir: resolve(self.build.output_dir.as_deref(), DEFAULT_OUTPUT_DIR),
        };
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_owned(), "mdx".to_owned()]
}
