//! Per-category asset pipelines.
//!
//! One generic entry point, `run_pipeline`, drives every category:
//!
//! ```text
//! scan (glob, sorted) -> chain (copy | sass | transpile | optimize | minify) -> write -> reload
//! ```
//!
//! Pipelines are synchronous filesystem work. Per-file chains run on the
//! rayon pool; the styles chain is a single bundle and runs in path order.

mod scan;

pub use scan::scan_category;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lightningcss::targets::Targets;
use rayon::prelude::*;
use thiserror::Error;

use crate::asset::TransformError;
use crate::asset::image::optimize_image;
use crate::asset::minify::{minify_css, minify_js};
use crate::asset::script::{ScriptTarget, transpile_and_minify};
use crate::asset::style::{browser_targets, bundle, compile_sass, is_partial};
use crate::config::ProjectConfig;
use crate::core::{AssetCategory, CategoryGlobs, Chain};
use crate::freshness::needs_update;
use crate::reload::ReloadSender;

// =============================================================================
// Types
// =============================================================================

/// A category run failed. The run is abandoned at the first failing file.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{}: {source}", path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: TransformError,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// File the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Transform { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

/// Outcome of one category run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub category: AssetCategory,
    /// Output files written.
    pub written: usize,
    /// Sources skipped because their output is up to date.
    pub skipped: usize,
    pub elapsed: Duration,
}

impl PipelineReport {
    /// One-line summary for logs, e.g. `3 files written, 1 up to date`.
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} file{} written",
            self.written,
            if self.written == 1 { "" } else { "s" }
        );
        if self.skipped > 0 {
            text.push_str(&format!(", {} up to date", self.skipped));
        }
        text
    }
}

/// Everything a pipeline run needs, resolved once at startup.
pub struct PipelineContext {
    pub config: Arc<ProjectConfig>,
    pub globs: CategoryGlobs,
    pub reload: ReloadSender,
    css_targets: Targets,
    script_target: ScriptTarget,
}

impl PipelineContext {
    /// Resolve browser and script targets from the configuration.
    pub fn new(config: Arc<ProjectConfig>, reload: ReloadSender) -> anyhow::Result<Self> {
        let css_targets = browser_targets(&config.styles.browsers)?;
        let script_target =
            ScriptTarget::parse(&config.scripts.target).map_err(|e| anyhow::anyhow!(e))?;
        Ok(Self {
            config,
            globs: CategoryGlobs::new(),
            reload,
            css_targets,
            script_target,
        })
    }

    fn src(&self) -> &Path {
        self.config.src_dir()
    }

    fn dist(&self) -> &Path {
        self.config.dist_dir()
    }
}

/// Per-file result inside a run.
enum Outcome {
    Written,
    Skipped,
}

// =============================================================================
// Entry point
// =============================================================================

/// Run one category: scan, transform, write, signal reload.
///
/// The reload channel is notified only when at least one file was written.
pub fn run_pipeline(category: AssetCategory, ctx: &PipelineContext) -> Result<PipelineReport, PipelineError> {
    let started = Instant::now();
    let sources = scan_category(ctx.src(), category, &ctx.globs);
    crate::debug!(category.name(); "{} source file(s)", sources.len());

    let outcomes = match category.chain() {
        Chain::SassBundle => run_styles(&sources, ctx)?,
        chain => sources
            .par_iter()
            .map(|source| process_file(category, chain, source, ctx))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let written = outcomes
        .iter()
        .filter(|o| matches!(o, Outcome::Written))
        .count();
    let report = PipelineReport {
        category,
        written,
        skipped: outcomes.len() - written,
        elapsed: started.elapsed(),
    };

    if report.written > 0 {
        ctx.reload.notify(category);
    }
    Ok(report)
}

// =============================================================================
// Chains
// =============================================================================

fn process_file(
    category: AssetCategory,
    chain: Chain,
    source: &Path,
    ctx: &PipelineContext,
) -> Result<Outcome, PipelineError> {
    let Some(output) = category.output_path(ctx.src(), ctx.dist(), source) else {
        return Ok(Outcome::Skipped);
    };

    let bytes = match chain {
        Chain::Copy => read(source)?,
        Chain::OptimizeImage => {
            if !needs_update(source, &output) {
                return Ok(Outcome::Skipped);
            }
            let bytes = read(source)?;
            optimize_image(source, &bytes, &ctx.config.images).map_err(transform_err(source))?
        }
        Chain::TranspileMinify => {
            let text = read_text(source)?;
            transpile_and_minify(&text, source, &ctx.script_target)
                .map_err(transform_err(source))?
                .into_bytes()
        }
        Chain::MinifyCss => {
            let text = read_text(source)?;
            minify_css(&text, &display_name(source), ctx.css_targets)
                .map_err(transform_err(source))?
                .into_bytes()
        }
        Chain::MinifyJs => {
            let text = read_text(source)?;
            minify_js(&text, &ctx.script_target.engines)
                .map_err(transform_err(source))?
                .into_bytes()
        }
        Chain::SassBundle => unreachable!("styles are bundled, not processed per file"),
    };

    write(&output, &bytes)?;
    Ok(Outcome::Written)
}

/// Compile every entry sheet, then write one autoprefixed bundle.
fn run_styles(sources: &[PathBuf], ctx: &PipelineContext) -> Result<Vec<Outcome>, PipelineError> {
    let styles_root = ctx.src().join(AssetCategory::Styles.glob_base());
    let entries: Vec<_> = sources.iter().filter(|p| !is_partial(p)).collect();
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let sheets = entries
        .iter()
        .map(|path| compile_sass(path, &styles_root).map_err(transform_err(path)))
        .collect::<Result<Vec<_>, _>>()?;

    let bundle_name = &ctx.config.styles.bundle;
    let output = ctx
        .dist()
        .join(AssetCategory::Styles.dest_subdir())
        .join(bundle_name);
    let css = bundle(&sheets, bundle_name, ctx.css_targets).map_err(transform_err(&output))?;

    write(&output, css.as_bytes())?;
    Ok(vec![Outcome::Written])
}

// =============================================================================
// Helpers
// =============================================================================

fn transform_err(path: &Path) -> impl FnOnce(TransformError) -> PipelineError + '_ {
    move |source| PipelineError::Transform {
        path: path.to_path_buf(),
        source,
    }
}

fn read(path: &Path) -> Result<Vec<u8>, PipelineError> {
    fs::read(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_text(path: &Path) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
    let io_err = |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, bytes).map_err(io_err)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// =============================================================================
// Tests
// =============================================================================
