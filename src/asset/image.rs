//! Lossless-ish image optimization by file extension.
//!
//! | Extension     | Treatment                                   |
//! |---------------|---------------------------------------------|
//! | jpg, jpeg     | re-encode at the configured quality         |
//! | png           | re-encode, best compression, adaptive filter |
//! | gif           | re-encode every frame, loop forever         |
//! | svg           | re-serialize with usvg, unless it would drop content |
//! | anything else | copied unchanged                            |
//!
//! An optimized result that is not smaller than the input is discarded
//! in favor of the original bytes.

use std::io::Cursor;
use std::path::Path;

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{AnimationDecoder, DynamicImage, ImageFormat};

use super::TransformError;
use crate::config::ImagesConfig;

/// Optimize one image, returning the bytes to write.
pub fn optimize_image(
    path: &Path,
    bytes: &[u8],
    config: &ImagesConfig,
) -> Result<Vec<u8>, TransformError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let optimized = match ext.as_deref() {
        Some("jpg" | "jpeg") => encode_jpeg(bytes, config.jpeg_quality)?,
        Some("png") => encode_png(bytes)?,
        Some("gif") => encode_gif(bytes)?,
        Some("svg") => minify_svg(bytes)?,
        _ => return Ok(bytes.to_vec()),
    };

    if optimized.len() < bytes.len() {
        Ok(optimized)
    } else {
        Ok(bytes.to_vec())
    }
}

fn encode_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>, TransformError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?;
    let mut out = Vec::new();
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
    Ok(out)
}

fn encode_png(bytes: &[u8]) -> Result<Vec<u8>, TransformError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    let mut out = Vec::new();
    img.write_with_encoder(PngEncoder::new_with_quality(
        &mut out,
        CompressionType::Best,
        FilterType::Adaptive,
    ))?;
    Ok(out)
}

fn encode_gif(bytes: &[u8]) -> Result<Vec<u8>, TransformError> {
    let frames = GifDecoder::new(Cursor::new(bytes))?
        .into_frames()
        .collect_frames()?;

    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        encoder.set_repeat(Repeat::Infinite)?;
        encoder.encode_frames(frames)?;
    }
    Ok(out)
}

/// Elements that usvg drops or flattens away: text needs shaping support
/// usvg is built without, the rest is outside its static render tree.
const UNSUPPORTED_SVG_ELEMENTS: &[&[u8]] = &[
    b"<text",
    b"<animate",
    b"<set",
    b"<image",
    b"<feImage",
    b"<script",
    b"<a ",
    b"<a>",
    b"<a\n",
    b"<foreignObject",
    b"<style",
];

/// Re-serialize an SVG through usvg.
///
/// Documents containing anything usvg would discard are passed through
/// untouched. usvg does not write a `viewBox`; one matching the output
/// size is added back so the image still scales.
fn minify_svg(bytes: &[u8]) -> Result<Vec<u8>, TransformError> {
    if UNSUPPORTED_SVG_ELEMENTS.iter().any(|tag| contains(bytes, tag)) {
        return Ok(bytes.to_vec());
    }

    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| TransformError::Svg(e.to_string()))?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        attributes_indent: usvg::Indent::None,
        ..Default::default()
    };

    let mut svg = tree.to_string(&write_options);
    if !svg.contains("viewBox=")
        && let Some(pos) = svg.find("<svg")
    {
        let size = tree.size();
        let view_box = format!(r#" viewBox="0 0 {} {}""#, size.width(), size.height());
        svg.insert_str(pos + "<svg".len(), &view_box);
    }
    Ok(svg.into_bytes())
}

#[inline]
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(size: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 128]))
    }

    fn encode_fast_png(img: &RgbImage) -> Vec<u8> {
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img.clone())
            .write_with_encoder(PngEncoder::new_with_quality(
                &mut out,
                CompressionType::Fast,
                FilterType::NoFilter,
            ))
            .unwrap();
        out
    }

    #[test]
    fn test_png_is_lossless_and_not_larger() {
        let img = gradient(64);
        let input = encode_fast_png(&img);

        let out = optimize_image(Path::new("a.png"), &input, &ImagesConfig::default()).unwrap();
        assert!(out.len() <= input.len());

        let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_jpeg_reencoded_at_quality() {
        let mut input = Vec::new();
        DynamicImage::ImageRgb8(gradient(64))
            .write_with_encoder(JpegEncoder::new_with_quality(&mut input, 100))
            .unwrap();

        let out = optimize_image(Path::new("photo.JPG"), &input, &ImagesConfig::default()).unwrap();
        assert!(out.len() < input.len());
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_gif_roundtrip_keeps_dimensions() {
        let mut input = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut input);
            let frame = image::Frame::new(DynamicImage::ImageRgb8(gradient(16)).to_rgba8());
            encoder.encode_frame(frame).unwrap();
        }

        let out = optimize_image(Path::new("anim.gif"), &input, &ImagesConfig::default()).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn test_svg_minified() {
        let input = br#"<?xml version="1.0"?>
<!-- exported by some editor -->
<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10">
    <g>
        <rect x="0" y="0" width="10" height="10" fill="red"/>
    </g>
</svg>
"#;
        let out = optimize_image(Path::new("icon.svg"), input, &ImagesConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<svg"));
        assert!(!text.contains("exported by"));
        assert!(text.len() < input.len());
    }

    #[test]
    fn test_svg_with_text_passes_through() {
        let input = br#"<svg xmlns="http://www.w3.org/2000/svg"><text x="0" y="10">Hi</text></svg>"#;
        let out = optimize_image(Path::new("label.svg"), input, &ImagesConfig::default()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_svg_keeps_view_box() {
        let input = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10">
    <!-- comment -->
    <rect x="0" y="0" width="10" height="10" fill="red"/>
</svg>
"#;
        let text = String::from_utf8(minify_svg(input).unwrap()).unwrap();
        assert!(!text.contains("comment"));
        assert!(text.contains(r#"viewBox="0 0 10 10""#), "got {text}");
    }

    #[test]
    fn test_svg_with_animation_and_image_passes_through() {
        let input = br#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="10" height="10" viewBox="0 0 10 10">
    <!-- a long comment that usvg would happily strip away -->
    <rect x="0" y="0" width="10" height="10" fill="red">
        <animate attributeName="opacity" from="1" to="0" dur="1s" repeatCount="indefinite"/>
    </rect>
    <image href="photo.png" x="0" y="0" width="10" height="10"/>
</svg>
"#;
        let out = optimize_image(Path::new("anim.svg"), input, &ImagesConfig::default()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_svg_with_link_passes_through() {
        let input = br#"<svg xmlns="http://www.w3.org/2000/svg"><a href="/about/"><rect width="5" height="5"/></a></svg>"#;
        let out = optimize_image(Path::new("nav.svg"), input, &ImagesConfig::default()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_invalid_svg() {
        let err = optimize_image(Path::new("x.svg"), b"<svg", &ImagesConfig::default()).unwrap_err();
        assert!(matches!(err, TransformError::Svg(_)));
    }

    #[test]
    fn test_unknown_extension_copied() {
        let input = b"\x00\x01webp-ish";
        let out = optimize_image(Path::new("a.webp"), input, &ImagesConfig::default()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_corrupt_png() {
        let err = optimize_image(Path::new("a.png"), b"not a png", &ImagesConfig::default()).unwrap_err();
        assert!(matches!(err, TransformError::Image(_)));
    }
}
