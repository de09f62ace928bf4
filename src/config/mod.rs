//! Project configuration management for `assetline.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error     # ConfigError, ConfigDiagnostics
//! ├── section   # [paths], [serve], [styles], [scripts], [images]
//! ├── util      # config file discovery
//! └── mod.rs    # ProjectConfig (this file)
//! ```
//!
//! The config file is optional. Without one, the project root is the
//! current directory and every section keeps its default, which matches
//! the fixed `src/` → `dist/` layout.

mod error;
mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{ImagesConfig, PathsConfig, ScriptsConfig, ServeConfig, StylesConfig};

use crate::cli::Cli;
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing assetline.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file, empty when running without one
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub styles: StylesConfig,

    #[serde(default)]
    pub scripts: ScriptsConfig,

    #[serde(default)]
    pub images: ImagesConfig,
}

impl ProjectConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file; the project root is
    /// the directory containing it, or cwd when none is found.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.resolve_paths();
        config.validate()?;
        Ok(config)
    }

    /// Defaults rooted at `root`, with paths resolved.
    pub fn for_root(root: &Path) -> Self {
        let mut config = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };
        config.resolve_paths();
        config
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Make `[paths]` absolute against the project root.
    fn resolve_paths(&mut self) {
        self.paths.src = self.root.join(&self.paths.src);
        self.paths.dist = self.root.join(&self.paths.dist);
    }

    /// Validate settings that would otherwise fail late or destructively.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        let (src, dist) = (&self.paths.src, &self.paths.dist);

        // `build` removes dist wholesale, so it must never cover sources.
        if src == dist || src.starts_with(dist) {
            diag.error_with_hint(
                "paths.dist",
                format!("output directory `{}` contains the sources", dist.display()),
                "point `dist` at a directory outside `src`",
            );
        }
        if dist == &self.root {
            diag.error("paths.dist", "output directory must not be the project root");
        }

        if !(1..=100).contains(&self.images.jpeg_quality) {
            diag.error(
                "images.jpeg_quality",
                format!("expected 1..=100, got {}", self.images.jpeg_quality),
            );
        }

        if self.styles.bundle.is_empty() || self.styles.bundle.contains(['/', '\\']) {
            diag.error("styles.bundle", "must be a plain file name");
        }

        if let Err(e) = lightningcss::targets::Browsers::from_browserslist(&self.styles.browsers) {
            diag.error_with_hint(
                "styles.browsers",
                format!("invalid browserslist query: {e}"),
                "e.g. [\"last 10 versions\"]",
            );
        }

        if let Err(e) = crate::asset::script::ScriptTarget::parse(&self.scripts.target) {
            diag.error("scripts.target", e);
        }

        diag.into_result()
    }

    /// Source tree root
    pub fn src_dir(&self) -> &Path {
        &self.paths.src
    }

    /// Output tree root
    pub fn dist_dir(&self) -> &Path {
        &self.paths.dist
    }

    /// Path relative to the project root, for display
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
