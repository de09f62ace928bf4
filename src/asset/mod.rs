//! Asset transformations.
//!
//! Each function takes source text or bytes and returns the transformed
//! output. None of them touch the filesystem except `style::compile_sass`,
//! which lets the Sass compiler resolve `@use`/`@import` on disk.
//!
//! | Module   | Library        | Used by                      |
//! |----------|----------------|------------------------------|
//! | `style`  | grass, lightningcss | styles                  |
//! | `script` | oxc transformer + minifier | scripts         |
//! | `helpers`| (inline JS)    | script output preludes       |
//! | `minify` | oxc, lightningcss | css-libs, js-libs         |
//! | `image`  | image, usvg    | images                       |

mod helpers;
pub mod image;
pub mod minify;
pub mod script;
pub mod style;

use thiserror::Error;

/// A transformation library rejected its input.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("sass: {0}")]
    Sass(String),

    #[error("css: {0}")]
    Css(String),

    #[error("js: {0}")]
    Script(String),

    #[error("image: {0}")]
    Image(#[from] ::image::ImageError),

    #[error("svg: {0}")]
    Svg(String),
}
