//! Script transpilation with the oxc transformer, followed by minification.

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::codegen::Codegen;
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::{EngineTargets, HelperLoaderMode, TransformOptions, Transformer};

use super::TransformError;
use super::helpers::prelude_for;
use super::minify::{minify_js, minify_program};

/// Output language level for the scripts category.
///
/// The transformer lowers syntax newer than the target; the minifier is
/// held to the same engines so that it does not fold lowered code back
/// into newer syntax (`a == null ? b : a` into `a ?? b`, for instance).
pub struct ScriptTarget {
    pub engines: EngineTargets,
    options: TransformOptions,
}

impl ScriptTarget {
    /// Parse a target such as `es2015`.
    pub fn parse(target: &str) -> Result<Self, String> {
        let engines = EngineTargets::from_target(target)?;
        let options = transform_options(target)?;
        Ok(Self { engines, options })
    }
}

/// Transformer options for an ECMAScript target.
///
/// Helpers are referenced through the `babelHelpers` global instead of
/// `require`d from a runtime package; `transpile_and_minify` defines them.
pub fn transform_options(target: &str) -> Result<TransformOptions, String> {
    let mut options = TransformOptions::from_target(target)?;
    options.helper_loader.mode = HelperLoaderMode::External;
    Ok(options)
}

/// Transpile `source` down to `target`, then compress and mangle it.
///
/// The output is a standalone script: any helper the lowered code calls
/// is defined at the top of the file.
pub fn transpile_and_minify(
    source: &str,
    path: &Path,
    target: &ScriptTarget,
) -> Result<String, TransformError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::unambiguous()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(TransformError::Script(err.to_string()));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();
    let ret = Transformer::new(&allocator, path, &target.options)
        .build_with_scoping(scoping, &mut program);
    if let Some(err) = ret.errors.first() {
        return Err(TransformError::Script(err.to_string()));
    }

    let lowered = Codegen::new().build(&program).code;
    let prelude = prelude_for(&lowered)?;
    if prelude.is_empty() {
        return Ok(minify_program(&allocator, &mut program, &target.engines));
    }
    minify_js(&format!("{prelude}{lowered}"), &target.engines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn es2015() -> ScriptTarget {
        ScriptTarget::parse("es2015").unwrap()
    }

    #[test]
    fn test_lowers_es2020_syntax() {
        let source = "window.name = window.user ?? 'guest';\nwindow.city = window.user?.address;\n";
        let out = transpile_and_minify(source, Path::new("app.js"), &es2015()).unwrap();
        assert!(!out.contains("??"), "got {out}");
        assert!(!out.contains("?."), "got {out}");
        assert!(out.contains("window.name"));
    }

    #[test]
    fn test_output_is_minified() {
        let source = "// greeting\nfunction greet(name) {\n  return `hello ${name}`;\n}\nwindow.greet = greet;\n";
        let out = transpile_and_minify(source, Path::new("app.js"), &es2015()).unwrap();
        assert!(!out.contains("greeting"));
        assert!(out.len() < source.len());
    }

    #[test]
    fn test_lowered_helpers_are_inlined() {
        let source = "window.a = { ...window.b, c: 1 };\nwindow.f = async () => await window.x;\n";
        let out = transpile_and_minify(source, Path::new("app.js"), &es2015()).unwrap();
        assert!(!out.contains("require"), "got {out}");
        assert!(!out.contains("import"), "got {out}");
        assert!(!out.contains("async("), "got {out}");
        assert!(!out.contains("await"), "got {out}");
        assert!(!out.contains("..."), "got {out}");
        assert!(out.contains("babelHelpers.objectSpread2"), "got {out}");
        assert!(out.contains("babelHelpers.asyncToGenerator"), "got {out}");
    }

    #[test]
    fn test_plain_code_has_no_prelude() {
        let out = transpile_and_minify("window.x = 1 + window.y;", Path::new("app.js"), &es2015()).unwrap();
        assert!(!out.contains("babelHelpers"), "got {out}");
    }

    #[test]
    fn test_syntax_error() {
        let err = transpile_and_minify("let = ;", Path::new("bad.js"), &es2015()).unwrap_err();
        assert!(matches!(err, TransformError::Script(_)));
    }

    #[test]
    fn test_parse_target() {
        assert!(ScriptTarget::parse("es2015").is_ok());
        assert!(ScriptTarget::parse("ES2018").is_ok());
        assert!(ScriptTarget::parse("not-a-target").is_err());
    }
}
