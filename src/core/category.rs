//! Asset category table.
//!
//! Every category maps a source glob (relative to the source root) to a
//! destination subdirectory (relative to the output root) and a
//! transformation chain:
//!
//! ```text
//! markup     **/*.html        -> ./        copy
//! styles     scss/**/*.scss   -> css/      sass -> concat -> autoprefix
//! scripts    js/**/*.js       -> js/       transpile -> minify
//! images     images/**/*.*    -> images/   newer-than -> optimize
//! fonts      fonts/**/*.*     -> fonts/    copy
//! css-libs   libs/css/*.css   -> css/      minify
//! js-libs    libs/js/*.js     -> js/       minify
//! ```

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

/// One of the fixed asset categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetCategory {
    Markup,
    Styles,
    Scripts,
    Images,
    Fonts,
    CssLibs,
    JsLibs,
}

/// Transformation applied to the files of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    /// Byte-for-byte copy.
    Copy,
    /// Compile every entry sheet, concatenate, autoprefix.
    SassBundle,
    /// Transpile to the configured target, then minify.
    TranspileMinify,
    /// Skip up-to-date outputs, optimize the rest.
    OptimizeImage,
    /// Minify pre-built stylesheets.
    MinifyCss,
    /// Minify pre-built scripts.
    MinifyJs,
}

impl AssetCategory {
    /// All categories, in table order.
    pub const ALL: [Self; 7] = [
        Self::Markup,
        Self::Styles,
        Self::Scripts,
        Self::Images,
        Self::Fonts,
        Self::CssLibs,
        Self::JsLibs,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Styles => "styles",
            Self::Scripts => "scripts",
            Self::Images => "images",
            Self::Fonts => "fonts",
            Self::CssLibs => "css-libs",
            Self::JsLibs => "js-libs",
        }
    }

    /// Source glob, relative to the source root.
    pub const fn source_glob(self) -> &'static str {
        match self {
            Self::Markup => "**/*.html",
            Self::Styles => "scss/**/*.scss",
            Self::Scripts => "js/**/*.js",
            Self::Images => "images/**/*.*",
            Self::Fonts => "fonts/**/*.*",
            Self::CssLibs => "libs/css/*.css",
            Self::JsLibs => "libs/js/*.js",
        }
    }

    /// Destination directory, relative to the output root.
    pub const fn dest_subdir(self) -> &'static str {
        match self {
            Self::Markup => "",
            Self::Styles | Self::CssLibs => "css",
            Self::Scripts | Self::JsLibs => "js",
            Self::Images => "images",
            Self::Fonts => "fonts",
        }
    }

    pub const fn chain(self) -> Chain {
        match self {
            Self::Markup | Self::Fonts => Chain::Copy,
            Self::Styles => Chain::SassBundle,
            Self::Scripts => Chain::TranspileMinify,
            Self::Images => Chain::OptimizeImage,
            Self::CssLibs => Chain::MinifyCss,
            Self::JsLibs => Chain::MinifyJs,
        }
    }

    /// Literal directory prefix of the glob (the part before any wildcard).
    ///
    /// Output paths preserve the source layout below this directory.
    pub fn glob_base(self) -> PathBuf {
        self.source_glob()
            .split('/')
            .take_while(|part| !part.contains(['*', '?', '[', '{']))
            .collect()
    }

    /// Compile the source glob. `*` does not cross directory separators.
    pub fn matcher(self) -> GlobMatcher {
        GlobBuilder::new(self.source_glob())
            .literal_separator(true)
            .build()
            .map(|glob| glob.compile_matcher())
            .unwrap_or_else(|e| unreachable!("invalid built-in glob {}: {e}", self.source_glob()))
    }

    /// Output path for a source file, or `None` if it lies outside the glob base.
    pub fn output_path(self, src_root: &Path, dist_root: &Path, source: &Path) -> Option<PathBuf> {
        let rel = source.strip_prefix(src_root.join(self.glob_base())).ok()?;
        Some(dist_root.join(self.dest_subdir()).join(rel))
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compiled globs for every category.
///
/// Shared by the pipeline scanner and the watcher router so both agree
/// on which files belong to which category.
#[derive(Clone)]
pub struct CategoryGlobs {
    matchers: Vec<(AssetCategory, GlobMatcher)>,
}

impl CategoryGlobs {
    pub fn new() -> Self {
        Self {
            matchers: AssetCategory::ALL
                .iter()
                .map(|&category| (category, category.matcher()))
                .collect(),
        }
    }

    /// Check a path relative to the source root against one category.
    pub fn matches(&self, category: AssetCategory, rel_path: &Path) -> bool {
        let rel = to_glob_path(rel_path);
        self.matchers
            .iter()
            .any(|(c, m)| *c == category && m.is_match(&rel))
    }

    /// All categories whose glob matches a path relative to the source root.
    pub fn categories_for(&self, rel_path: &Path) -> Vec<AssetCategory> {
        let rel = to_glob_path(rel_path);
        self.matchers
            .iter()
            .filter(|(_, m)| m.is_match(&rel))
            .map(|(c, _)| *c)
            .collect()
    }
}

impl Default for CategoryGlobs {
    fn default() -> Self {
        Self::new()
    }
}

/// Globs are written with `/`; normalize platform separators.
fn to_glob_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
