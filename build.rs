//! Build script for minifying the embedded live-reload client.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::fs;
use std::path::Path;

/// Placeholder that must survive minification (replaced at serve time).
const WS_PORT_PLACEHOLDER: &str = "__ASSETLINE_WS_PORT__";

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir);

    minify_js_file(
        "src/embed/serve/livereload.js",
        &out_path.join("livereload.min.js"),
    );

    println!("cargo:rerun-if-changed=src/embed/serve/livereload.js");
}

fn minify_js_file(src: &str, dest: &Path) {
    let source = fs::read_to_string(src).unwrap_or_else(|e| panic!("failed to read {src}: {e}"));
    let minified = minify_js(&source).unwrap_or(source);
    assert!(
        minified.contains(WS_PORT_PLACEHOLDER),
        "minified {src} lost the websocket port placeholder"
    );
    fs::write(dest, minified).unwrap_or_else(|e| panic!("failed to write {}: {e}", dest.display()));
}

fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}
