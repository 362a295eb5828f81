// src/codec/encoder.rs
//
// Encoder operations: JPEG (mozjpeg), PNG (image + optional oxipng),
// BMP, TGA and Radiance HDR.

use super::common::run_with_panic_policy;
use crate::error::PixmapError;
use crate::ops::OutputFormat;
use crate::raster::Raster;
use image::{DynamicImage, ImageFormat, Rgb32FImage, RgbImage};
use mozjpeg::{ColorSpace, Compress, ScanMode};
use std::io::Cursor;
use tracing::debug;

type EncoderResult<T> = std::result::Result<T, PixmapError>;

/// Encode `raster` as `format`.
pub fn encode(
    raster: &Raster,
    format: OutputFormat,
    jpeg_quality: u8,
    optimize_png: bool,
) -> EncoderResult<Vec<u8>> {
    if raster.width() == 0 || raster.height() == 0 {
        return Err(PixmapError::encode_failed(
            format.as_str(),
            "image has zero width or height",
        ));
    }

    let encoded = match format {
        OutputFormat::Png => encode_png(raster, optimize_png)?,
        OutputFormat::Jpeg => encode_jpeg(raster, jpeg_quality)?,
        OutputFormat::Bmp => encode_with_image_crate(raster, ImageFormat::Bmp)?,
        OutputFormat::Tga => encode_with_image_crate(raster, ImageFormat::Tga)?,
        OutputFormat::Hdr => encode_hdr(raster)?,
    };
    debug!(
        target: "pixmap::codec",
        format = format.as_str(),
        width = raster.width(),
        height = raster.height(),
        bytes = encoded.len(),
        "encoded"
    );
    Ok(encoded)
}

fn to_rgb_image(raster: &Raster) -> EncoderResult<RgbImage> {
    RgbImage::from_raw(raster.width(), raster.height(), raster.data().to_vec())
        .ok_or_else(PixmapError::corrupted_image)
}

/// Encode to JPEG using mozjpeg.
pub fn encode_jpeg(raster: &Raster, quality: u8) -> EncoderResult<Vec<u8>> {
    run_with_panic_policy("encode:jpeg", || {
        let quality = quality.min(100) as f32;
        let (w, h) = raster.dimensions();
        let pixels = raster.data();

        let expected_len = (w as usize) * (h as usize) * 3;
        if pixels.len() != expected_len {
            return Err(PixmapError::corrupted_image());
        }

        let mut comp = Compress::new(ColorSpace::JCS_RGB);
        comp.set_size(w as usize, h as usize);
        comp.set_color_space(ColorSpace::JCS_YCbCr);
        comp.set_quality(quality);

        comp.set_chroma_sampling_pixel_sizes((2, 2), (2, 2));
        comp.set_optimize_coding(true);
        comp.set_optimize_scans(true);
        comp.set_scan_optimization_mode(ScanMode::AllComponentsTogether);

        let mut output = Vec::with_capacity((w as usize * h as usize * 3 / 10).max(4096));
        {
            let mut writer = comp.start_compress(&mut output).map_err(|e| {
                PixmapError::encode_failed(
                    "jpeg",
                    format!("mozjpeg: failed to start compress: {e:?}"),
                )
            })?;

            let stride = w as usize * 3;
            for row in pixels.chunks(stride) {
                writer.write_scanlines(row).map_err(|e| {
                    PixmapError::encode_failed(
                        "jpeg",
                        format!("mozjpeg: failed to write scanlines: {e:?}"),
                    )
                })?;
            }

            writer.finish().map_err(|e| {
                PixmapError::encode_failed("jpeg", format!("mozjpeg: failed to finish: {e:?}"))
            })?;
        }

        Ok(output)
    })
}

/// Encode to PNG using the image crate, optionally recompressed by oxipng.
pub fn encode_png(raster: &Raster, optimize: bool) -> EncoderResult<Vec<u8>> {
    let buf = encode_with_image_crate(raster, ImageFormat::Png)?;
    if !optimize {
        return Ok(buf);
    }

    run_with_panic_policy("encode:png:oxipng", || {
        let mut options = oxipng::Options::from_preset(4);
        options.strip = oxipng::StripChunks::None;
        oxipng::optimize_from_memory(&buf, &options).map_err(|e| {
            PixmapError::encode_failed("png", format!("oxipng optimization failed: {e}"))
        })
    })
}

/// Encode through the image crate's writer for `format`.
pub fn encode_with_image_crate(raster: &Raster, format: ImageFormat) -> EncoderResult<Vec<u8>> {
    let name = format.extensions_str().first().copied().unwrap_or("image");
    run_with_panic_policy("encode:image", || {
        let img = DynamicImage::ImageRgb8(to_rgb_image(raster)?);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format)
            .map_err(|e| PixmapError::encode_failed(name, e.to_string()))?;
        Ok(buf)
    })
}

/// Encode to Radiance HDR. Each byte becomes the float `v / 255`, so an
/// HDR round trip scales back by 255.
pub fn encode_hdr(raster: &Raster) -> EncoderResult<Vec<u8>> {
    run_with_panic_policy("encode:hdr", || {
        let floats: Vec<f32> = raster.data().iter().map(|&v| v as f32 / 255.0).collect();
        let img = Rgb32FImage::from_raw(raster.width(), raster.height(), floats)
            .ok_or_else(PixmapError::corrupted_image)?;
        let mut buf = Vec::new();
        DynamicImage::ImageRgb32F(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Hdr)
            .map_err(|e| PixmapError::encode_failed("hdr", e.to_string()))?;
        Ok(buf)
    })
}
