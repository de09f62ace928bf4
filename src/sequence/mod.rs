//! Fixed step sequences for `build` and `develop`.
//!
//! ```text
//! build:   clean -> markup -> styles -> scripts -> markup -> images -> fonts -> css-libs -> js-libs
//! develop:          markup -> styles -> scripts -> markup -> images -> fonts -> css-libs -> js-libs
//! ```
//!
//! Steps run strictly in order. A failing pipeline is logged and the
//! sequence moves on; a failing clean aborts before any pipeline runs.

mod clean;

pub use clean::{CleanError, clean_output};

use std::time::{Duration, Instant};

use crate::core::{AssetCategory, is_shutdown};
use crate::pipeline::{PipelineContext, run_pipeline};

/// One entry of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Clean,
    Pipeline(AssetCategory),
}

impl Step {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Pipeline(category) => category.name(),
        }
    }
}

use AssetCategory::{CssLibs, Fonts, Images, JsLibs, Markup, Scripts, Styles};

/// `assetline build`. Markup runs twice.
pub const BUILD_SEQUENCE: [Step; 9] = [
    Step::Clean,
    Step::Pipeline(Markup),
    Step::Pipeline(Styles),
    Step::Pipeline(Scripts),
    Step::Pipeline(Markup),
    Step::Pipeline(Images),
    Step::Pipeline(Fonts),
    Step::Pipeline(CssLibs),
    Step::Pipeline(JsLibs),
];

/// `assetline` (develop). Same as build, without clean.
pub const DEVELOP_SEQUENCE: [Step; 8] = [
    Step::Pipeline(Markup),
    Step::Pipeline(Styles),
    Step::Pipeline(Scripts),
    Step::Pipeline(Markup),
    Step::Pipeline(Images),
    Step::Pipeline(Fonts),
    Step::Pipeline(CssLibs),
    Step::Pipeline(JsLibs),
];

/// Totals for one sequence run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SequenceSummary {
    pub steps: usize,
    pub written: usize,
    /// Categories whose run failed, in the order they failed.
    pub failed: Vec<AssetCategory>,
    pub elapsed: Duration,
}

impl SequenceSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// e.g. `9 steps, 14 files written in 1.2s, failed: styles`
    pub fn line(&self) -> String {
        let mut line = format!(
            "{} steps, {} file{} written in {:.1?}",
            self.steps,
            self.written,
            if self.written == 1 { "" } else { "s" },
            self.elapsed
        );
        if !self.failed.is_empty() {
            let names: Vec<_> = self.failed.iter().map(|c| c.name()).collect();
            line.push_str(&format!(", failed: {}", names.join(", ")));
        }
        line
    }
}

/// Run `steps` in order against `ctx`.
///
/// Returns early (with what ran so far) when shutdown is requested.
pub fn run_sequence(steps: &[Step], ctx: &PipelineContext) -> Result<SequenceSummary, CleanError> {
    let started = Instant::now();
    let mut summary = SequenceSummary::default();

    for &step in steps {
        if is_shutdown() {
            break;
        }
        summary.steps += 1;

        match step {
            Step::Clean => {
                clean_output(ctx.config.dist_dir())?;
                crate::debug!("clean"; "removed {}", ctx.config.dist_dir().display());
            }
            Step::Pipeline(category) => match run_pipeline(category, ctx) {
                Ok(report) => {
                    summary.written += report.written;
                    crate::log!(category.name(); "{} ({:.1?})", report.summary(), report.elapsed);
                }
                Err(e) => {
                    crate::log!(category.name(); "failed: {e:#}");
                    if !summary.failed.contains(&category) {
                        summary.failed.push(category);
                    }
                }
            },
        }
    }

    summary.elapsed = started.elapsed();
    crate::log!("done"; "{}", summary.line());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::config::ProjectConfig;
    use crate::reload::ReloadSender;

    fn project() -> (TempDir, PipelineContext) {
        let dir = TempDir::new().unwrap();
        let config = Arc::new(ProjectConfig::for_root(dir.path()));
        let ctx = PipelineContext::new(config, ReloadSender::disabled()).unwrap();
        (dir, ctx)
    }

    fn put(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn seed(ctx: &PipelineContext) {
        let src = ctx.config.src_dir();
        put(src, "index.html", "<html><body>home</body></html>");
        put(src, "scss/main.scss", "$c: red;\nbody { color: $c; }\n");
        put(src, "js/app.js", "window.x = window.a ?? 1;\n");
        put(src, "images/raw.bin", "bytes");
        put(src, "fonts/a.woff2", "font");
        put(src, "libs/css/reset.css", "html {\n  margin: 0;\n}\n");
        put(src, "libs/js/vendor.js", "function vendor() {\n  return 1;\n}\n");
    }

    /// Relative path -> bytes for every file under `root`.
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        jwalk::WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let path = e.path();
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                (rel, fs::read(&path).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_sequences_match() {
        assert_eq!(BUILD_SEQUENCE[0], Step::Clean);
        assert_eq!(&BUILD_SEQUENCE[1..], &DEVELOP_SEQUENCE[..]);

        let markup_steps = DEVELOP_SEQUENCE
            .iter()
            .filter(|s| **s == Step::Pipeline(Markup))
            .count();
        assert_eq!(markup_steps, 2);
    }

    #[test]
    fn test_build_writes_every_category() {
        let (_dir, ctx) = project();
        seed(&ctx);

        let summary = run_sequence(&BUILD_SEQUENCE, &ctx).unwrap();
        assert!(summary.is_success());
        assert_eq!(summary.steps, 9);

        let dist = ctx.config.dist_dir();
        for rel in [
            "index.html",
            "css/main.min.css",
            "js/app.js",
            "images/raw.bin",
            "fonts/a.woff2",
            "css/reset.css",
            "js/vendor.js",
        ] {
            assert!(dist.join(rel).is_file(), "missing {rel}");
        }
    }

    #[test]
    fn test_build_twice_is_identical() {
        let (_dir, ctx) = project();
        seed(&ctx);

        run_sequence(&BUILD_SEQUENCE, &ctx).unwrap();
        let first = snapshot(ctx.config.dist_dir());
        run_sequence(&BUILD_SEQUENCE, &ctx).unwrap();
        let second = snapshot(ctx.config.dist_dir());

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_removes_stale_outputs() {
        let (_dir, ctx) = project();
        seed(&ctx);
        put(ctx.config.dist_dir(), "old/leftover.html", "stale");

        run_sequence(&BUILD_SEQUENCE, &ctx).unwrap();
        assert!(!ctx.config.dist_dir().join("old/leftover.html").exists());
    }

    #[test]
    fn test_develop_keeps_existing_outputs() {
        let (_dir, ctx) = project();
        seed(&ctx);
        put(ctx.config.dist_dir(), "old/leftover.html", "stale");

        let summary = run_sequence(&DEVELOP_SEQUENCE, &ctx).unwrap();
        assert_eq!(summary.steps, 8);
        assert!(ctx.config.dist_dir().join("old/leftover.html").exists());
        assert!(ctx.config.dist_dir().join("index.html").exists());
    }

    #[test]
    fn test_failed_category_does_not_stop_others() {
        let (_dir, ctx) = project();
        seed(&ctx);
        put(ctx.config.src_dir(), "scss/main.scss", "body { color: $missing; }");

        let summary = run_sequence(&BUILD_SEQUENCE, &ctx).unwrap();
        assert_eq!(summary.failed, vec![Styles]);
        assert!(!summary.is_success());

        let dist = ctx.config.dist_dir();
        assert!(!dist.join("css/main.min.css").exists());
        assert!(dist.join("js/app.js").exists());
        assert!(dist.join("css/reset.css").exists());
    }

    #[test]
    fn test_clean_failure_is_fatal() {
        let (_dir, ctx) = project();
        seed(&ctx);
        // A plain file where the output directory should be.
        fs::write(ctx.config.dist_dir(), "in the way").unwrap();

        assert!(run_sequence(&BUILD_SEQUENCE, &ctx).is_err());
    }

    #[test]
    fn test_summary_line() {
        let summary = SequenceSummary {
            steps: 9,
            written: 1,
            failed: vec![Styles, Scripts],
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(summary.line(), "9 steps, 1 file written in 1.5s, failed: styles, scripts");
    }
}
