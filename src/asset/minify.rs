//! Minification for pre-built JS and CSS libraries.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::Targets;
use oxc::allocator::Allocator;
use oxc::ast::ast::Program;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use oxc::transformer::EngineTargets;

use super::TransformError;

/// Minify JavaScript source code without raising its language level
/// above what `targets` support.
///
/// The source kind (script or module) is inferred from the presence of
/// `import`/`export`, so classic `<script>` globals are never mangled away.
pub fn minify_js(source: &str, targets: &EngineTargets) -> Result<String, TransformError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::unambiguous()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(TransformError::Script(err.to_string()));
    }
    let mut program = ret.program;
    Ok(minify_program(&allocator, &mut program, targets))
}

/// Compress, mangle and print an already-parsed program.
pub(super) fn minify_program<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    targets: &EngineTargets,
) -> String {
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions {
            target: targets.clone(),
            ..CompressOptions::smallest()
        }),
    };
    let ret = Minifier::new(options).minify(allocator, program);
    Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(program)
        .code
}

/// Minify CSS source code, lowering syntax and adding vendor prefixes
/// for `targets`.
pub fn minify_css(source: &str, filename: &str, targets: Targets) -> Result<String, TransformError> {
    let options = ParserOptions {
        filename: filename.to_string(),
        ..ParserOptions::default()
    };
    let mut stylesheet =
        StyleSheet::parse(source, options).map_err(|e| TransformError::Css(e.to_string()))?;
    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| TransformError::Css(e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| TransformError::Css(e.to_string()))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn es2015() -> EngineTargets {
        EngineTargets::from_target("es2015").unwrap()
    }

    #[test]
    fn test_minify_css_strips_whitespace() {
        let source = "body {\n  color: red;\n  margin: 0px;\n}\n\n/* note */\n";
        let out = minify_css(source, "normalize.css", Targets::default()).unwrap();
        assert!(!out.contains('\n'));
        assert!(!out.contains("note"));
        assert!(out.contains("color:red"));
    }

    #[test]
    fn test_minify_css_rejects_invalid_selector() {
        let err = minify_css("$$$ { color: red }", "broken.css", Targets::default()).unwrap_err();
        assert!(matches!(err, TransformError::Css(_)));
    }

    #[test]
    fn test_minify_js_shrinks() {
        let source = "function greet(name) {\n  // say hello\n  return 'hello ' + name;\n}\nwindow.greet = greet;\n";
        let out = minify_js(source, &es2015()).unwrap();
        assert!(out.len() < source.len());
        assert!(!out.contains("say hello"));
        assert!(out.contains("window.greet"));
    }

    #[test]
    fn test_minify_js_keeps_script_globals() {
        // Classic scripts share globals across files; top-level names must survive.
        let out = minify_js("function initSlider() { return 1; }", &es2015()).unwrap();
        assert!(out.contains("initSlider"));
    }

    #[test]
    fn test_minify_js_syntax_error() {
        let err = minify_js("function (", &es2015()).unwrap_err();
        assert!(matches!(err, TransformError::Script(_)));
    }
}
