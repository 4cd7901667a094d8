//! # Image Processing Module
//!
//! Questo modulo è l'adapter verso gli encoder raster. Tutta la codifica
//! avviene in memoria tramite librerie esterne trattate come black box:
//!
//! | Formato | Decodifica | Codifica | Libreria |
//! |---------|-----------|----------|----------|
//! | PNG     | ✅        | ✅       | `image` (compressione massima) |
//! | JPEG    | ✅        | ✅       | `image` (qualità 1-100) |
//! | WebP    | ✅        | ✅       | `webp` / libwebp (qualità 1-100) |
//! | SVG     | ✅ (render) | ❌    | `resvg` + `usvg` + `tiny-skia` |
//!
//! ## Responsabilità:
//! - `compress_raster()`: Ricodifica un'immagine raster nel formato richiesto
//! - `rasterize_svg()`: Renderizza un SVG a 300 DPI e lo codifica come raster
//!
//! Entrambe le funzioni hanno la stessa forma "byte in, byte a qualità Q out":
//! è il contratto su cui si appoggia la ricerca target-size, che le invoca
//! ripetutamente variando solo la qualità.
//!
//! ## Note sulla qualità:
//! - PNG è lossless: la qualità non ha effetto, si usa sempre lo sforzo di
//!   compressione massimo.
//! - JPEG e WebP usano la qualità 1-100 passata dal chiamante.

use crate::config::OutputFormat;
use crate::error::OptimizeError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageEncoder};
use tracing::debug;
use usvg::TreeParsing;

/// Render density for SVG rasterization, relative to the CSS default of 96
const SVG_RENDER_DPI: f32 = 300.0;

/// Re-encode a raster image (PNG/JPG/JPEG/WebP) into the requested format
/// at the given quality.
pub fn compress_raster(
    data: &[u8],
    input_ext: &str,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, OptimizeError> {
    let img = decode_raster(data, input_ext)?;
    encode_raster(&img, format, quality)
}

/// Rasterize an SVG at 300 DPI and encode the pixels into the requested
/// raster format at the given quality.
pub fn rasterize_svg(
    data: &[u8],
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, OptimizeError> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())?;
    let rtree = resvg::Tree::from_usvg(&tree);

    let scale = SVG_RENDER_DPI / 96.0;
    let width = ((rtree.size.width() * scale).ceil() as u32).max(1);
    let height = ((rtree.size.height() * scale).ceil() as u32).max(1);

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| OptimizeError::Encode(format!("invalid pixmap size {}x{}", width, height)))?;
    rtree.render(
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    debug!("Rasterized SVG to {}x{} pixels (scale {:.3})", width, height, scale);

    let mut rgba = image::RgbaImage::new(width, height);
    for (premultiplied, out) in pixmap.pixels().iter().zip(rgba.pixels_mut()) {
        let c = premultiplied.demultiply();
        *out = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    encode_raster(&DynamicImage::ImageRgba8(rgba), format, quality)
}

/// Decode input bytes into a `DynamicImage`.
///
/// WebP goes through libwebp, which also handles lossy streams; everything
/// else is sniffed by the `image` crate.
fn decode_raster(data: &[u8], input_ext: &str) -> Result<DynamicImage, OptimizeError> {
    if input_ext == "webp" {
        return webp::Decoder::new(data)
            .decode()
            .map(|img| img.to_image())
            .ok_or_else(|| OptimizeError::Encode("failed to decode WebP input".to_string()));
    }

    Ok(image::load_from_memory(data)?)
}

/// Encode a decoded image into the requested output format.
fn encode_raster(
    img: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, OptimizeError> {
    match format {
        OutputFormat::Png => {
            let rgba = img.to_rgba8();
            let mut buffer = Vec::new();
            let encoder =
                PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
            encoder.write_image(rgba.as_raw(), rgba.width(), rgba.height(), ColorType::Rgba8)?;
            Ok(buffer)
        }
        OutputFormat::Jpg => {
            // JPEG has no alpha channel
            let rgb = img.to_rgb8();
            let mut buffer = Vec::new();
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            encoder.encode_image(&rgb)?;
            Ok(buffer)
        }
        OutputFormat::Webp => {
            let rgba = img.to_rgba8();
            let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
            Ok(encoder.encode(quality as f32).to_vec())
        }
        OutputFormat::Svg => Err(OptimizeError::UnsupportedFormat("svg".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Gradient test image: compresses differently at different qualities
    fn test_image_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(64, 64, |x, y| {
            image::Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255])
        });
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            &mut buffer,
            CompressionType::Default,
            FilterType::Adaptive,
        );
        encoder
            .write_image(img.as_raw(), 64, 64, ColorType::Rgba8)
            .unwrap();
        buffer
    }

    #[test]
    fn test_compress_raster_png_to_png() {
        let data = test_image_bytes();
        let out = compress_raster(&data, "png", OutputFormat::Png, 80).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 64);
    }

    #[test]
    fn test_compress_raster_jpeg_quality_affects_size() {
        let data = test_image_bytes();
        let low = compress_raster(&data, "png", OutputFormat::Jpg, 10).unwrap();
        let high = compress_raster(&data, "png", OutputFormat::Jpg, 95).unwrap();
        assert!(low.len() < high.len(), "q10 ({}) vs q95 ({})", low.len(), high.len());
    }

    #[test]
    fn test_compress_raster_webp_roundtrip() {
        let data = test_image_bytes();
        let out = compress_raster(&data, "png", OutputFormat::Webp, 80).unwrap();
        let decoded = webp::Decoder::new(&out).decode().unwrap().to_image();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 64);

        // WebP input decodes through libwebp as well
        let back = compress_raster(&out, "webp", OutputFormat::Png, 80).unwrap();
        assert!(image::load_from_memory(&back).is_ok());
    }

    #[test]
    fn test_compress_raster_rejects_svg_target() {
        let data = test_image_bytes();
        let err = compress_raster(&data, "png", OutputFormat::Svg, 80).unwrap_err();
        assert!(matches!(err, OptimizeError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_rasterize_svg_scales_to_render_density() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="96" height="48" viewBox="0 0 96 48"><rect width="96" height="48" fill="#ff0000"/></svg>"##;
        let out = rasterize_svg(svg, OutputFormat::Png, 80).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        // 96 CSS px at 300 DPI
        assert_eq!(decoded.width(), 300);
        assert_eq!(decoded.height(), 150);
    }

    #[test]
    fn test_rasterize_svg_invalid_input() {
        assert!(rasterize_svg(b"not an svg", OutputFormat::Png, 80).is_err());
    }
}
