// src/codec/decoder.rs
//
// Decoder routing: JPEG (mozjpeg), PNG (zune-png), everything else through
// the image crate. Output is always 8-bit RGB.

use super::common::run_with_panic_policy;
use crate::config::DecodeLimits;
use crate::error::PixmapError;
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, ImageReader, RgbImage, RgbaImage,
};
use mozjpeg::Decompress;
use std::io::Cursor;
use tracing::debug;
use zune_core::bytestream::ZCursor;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_core::result::DecodingResult;
use zune_png::PngDecoder;

type DecoderResult<T> = std::result::Result<T, PixmapError>;

/// Decode JPEG using mozjpeg (libjpeg-turbo). Single-component JPEGs stay
/// grayscale so callers can see the source layout; everything else is
/// converted to RGB in the decoder.
pub fn decode_jpeg_mozjpeg(data: &[u8], limits: &DecodeLimits) -> DecoderResult<DynamicImage> {
    run_with_panic_policy("decode:mozjpeg", || {
        if !data.windows(2).any(|pair| pair == [0xFF, 0xD9]) {
            return Err(PixmapError::decode_failed(
                "mozjpeg: missing JPEG EOI marker",
            ));
        }

        let decompress = Decompress::new_mem(data).map_err(|e| {
            PixmapError::decode_failed(format!("mozjpeg decompress init failed: {e:?}"))
        })?;

        let width = u32::try_from(decompress.width())
            .map_err(|_| PixmapError::decode_failed("mozjpeg: width out of range"))?;
        let height = u32::try_from(decompress.height())
            .map_err(|_| PixmapError::decode_failed("mozjpeg: height out of range"))?;
        limits.check(width, height)?;

        if decompress.components().len() == 1 {
            let mut started = decompress.grayscale().map_err(|e| {
                PixmapError::decode_failed(format!("mozjpeg grayscale start failed: {e:?}"))
            })?;
            let luma = started.read_scanlines_flat().map_err(|e| {
                PixmapError::decode_failed(format!("mozjpeg: failed to read scanlines: {e:?}"))
            })?;
            return GrayImage::from_raw(width, height, luma)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(|| {
                    PixmapError::decode_failed("mozjpeg: failed to create image from raw data")
                });
        }

        let mut started = decompress.rgb().map_err(|e| {
            PixmapError::decode_failed(format!("mozjpeg rgb conversion failed: {e:?}"))
        })?;
        let flat_pixels = started.read_scanlines_flat().map_err(|e| {
            PixmapError::decode_failed(format!("mozjpeg: failed to read scanlines: {e:?}"))
        })?;

        RgbImage::from_raw(width, height, flat_pixels)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| {
                PixmapError::decode_failed("mozjpeg: failed to create image from raw data")
            })
    })
}

/// Decode PNG using zune-png. 16-bit input is stripped to 8-bit.
pub fn decode_png_zune(data: &[u8], limits: &DecodeLimits) -> DecoderResult<DynamicImage> {
    run_with_panic_policy("decode:png", || {
        let options = DecoderOptions::default().png_set_strip_to_8bit(true);
        let mut decoder = PngDecoder::new_with_options(ZCursor::new(data), options);

        decoder
            .decode_headers()
            .map_err(|e| PixmapError::decode_failed(format!("png: bad header: {e}")))?;
        let (width, height) = decoder
            .dimensions()
            .ok_or_else(|| PixmapError::decode_failed("png: missing header info"))?;
        let width = u32::try_from(width)
            .map_err(|_| PixmapError::decode_failed("png: width out of range"))?;
        let height = u32::try_from(height)
            .map_err(|_| PixmapError::decode_failed("png: height out of range"))?;
        // Reject before the pixel buffer is allocated
        limits.check(width, height)?;

        let pixels = decoder
            .decode()
            .map_err(|e| PixmapError::decode_failed(format!("png: decode failed: {e}")))?;

        let buf = match pixels {
            DecodingResult::U8(v) => v,
            _ => {
                return Err(PixmapError::decode_failed(
                    "png: unexpected non-U8 pixel buffer",
                ))
            }
        };

        let colorspace = decoder
            .colorspace()
            .ok_or_else(|| PixmapError::decode_failed("png: missing colorspace"))?;

        let img = match colorspace {
            ColorSpace::RGB => RgbImage::from_raw(width, height, buf)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| PixmapError::decode_failed("png: failed to build RGB image"))?,
            ColorSpace::RGBA => RgbaImage::from_raw(width, height, buf)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(|| PixmapError::decode_failed("png: failed to build RGBA image"))?,
            ColorSpace::Luma => GrayImage::from_raw(width, height, buf)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(|| PixmapError::decode_failed("png: failed to build Luma image"))?,
            ColorSpace::LumaA => GrayAlphaImage::from_raw(width, height, buf)
                .map(DynamicImage::ImageLumaA8)
                .ok_or_else(|| PixmapError::decode_failed("png: failed to build LumaA image"))?,
            other => {
                return Err(PixmapError::decode_failed(format!(
                    "png: unsupported colorspace {:?}",
                    other
                )))
            }
        };

        Ok(img)
    })
}

/// Decode BMP, TGA, HDR and anything else the image crate supports.
pub fn decode_with_image_crate(
    data: &[u8],
    format: ImageFormat,
    limits: &DecodeLimits,
) -> DecoderResult<DynamicImage> {
    run_with_panic_policy("decode:image", || {
        ensure_dimensions_safe(data, format, limits)?;
        ImageReader::with_format(Cursor::new(data), format)
            .decode()
            .map_err(|e| PixmapError::decode_failed(format!("decode failed: {e}")))
    })
}

/// Detect input format using magic bytes. Returns None if unknown.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Unified decode entrypoint:
/// - Detect format once (magic bytes)
/// - Route JPEG to mozjpeg, PNG to zune-png, others to the image crate
/// - Re-check the decoded size against `limits`
pub fn decode_image(
    bytes: &[u8],
    limits: &DecodeLimits,
) -> DecoderResult<(DynamicImage, Option<ImageFormat>)> {
    if bytes.is_empty() {
        return Err(PixmapError::corrupted_image());
    }

    let detected = detect_format(bytes);
    debug!(target: "pixmap::codec", format = ?detected, len = bytes.len(), "decoding");

    let (img, format) = match detected {
        Some(ImageFormat::Jpeg) => (decode_jpeg_mozjpeg(bytes, limits)?, ImageFormat::Jpeg),
        Some(ImageFormat::Png) => (decode_png_zune(bytes, limits)?, ImageFormat::Png),
        Some(other) => (decode_with_image_crate(bytes, other, limits)?, other),
        // TGA has no magic bytes; anything unrecognised is tried as TGA
        None => (
            decode_with_image_crate(bytes, ImageFormat::Tga, limits)?,
            ImageFormat::Tga,
        ),
    };
    limits.check(img.width(), img.height())?;
    Ok((img, Some(format)))
}

/// Read the header and reject oversized images before decoding pixels.
/// Headers the reader cannot parse are left for the decoder to report.
pub fn ensure_dimensions_safe(
    bytes: &[u8],
    format: ImageFormat,
    limits: &DecodeLimits,
) -> DecoderResult<()> {
    let reader = ImageReader::with_format(Cursor::new(bytes), format);
    if let Ok((width, height)) = reader.into_dimensions() {
        return limits.check(width, height);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb};

    fn encode_with_image(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 7]));
        encode_with_image(DynamicImage::ImageRgb8(img), ImageFormat::Png)
    }

    #[test]
    fn test_ensure_dimensions_safe_allows_small_image() {
        let data = encode_png(64, 64);
        assert!(ensure_dimensions_safe(&data, ImageFormat::Png, &DecodeLimits::default()).is_ok());
    }

    #[test]
    fn test_tga_is_decoded_without_magic_bytes() {
        let tga = encode_with_image(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([5, 6, 7]))),
            ImageFormat::Tga,
        );
        let (img, fmt) = decode_image(&tga, &DecodeLimits::default()).unwrap();
        assert_eq!(fmt, Some(ImageFormat::Tga));
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.to_rgb8().get_pixel(3, 2).0, [5, 6, 7]);
    }

    #[test]
    fn test_unrecognised_bytes_fail_as_tga() {
        let err = decode_image(b"this is not an image", &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, PixmapError::DecodeFailed { .. }));
    }

    #[test]
    fn test_limits_reject_large_png_before_decode() {
        let limits = DecodeLimits {
            max_dimension: 16,
            max_pixels: 1_000,
        };
        let data = encode_png(17, 1);
        let err = decode_image(&data, &limits).unwrap_err();
        assert!(matches!(err, PixmapError::DimensionExceedsLimit { .. }));
    }

    #[test]
    fn test_detect_format_jpeg_and_png() {
        let png = encode_png(2, 2);
        let jpeg = encode_with_image(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]))),
            ImageFormat::Jpeg,
        );
        assert_eq!(detect_format(&png), Some(ImageFormat::Png));
        assert_eq!(detect_format(&jpeg), Some(ImageFormat::Jpeg));
        assert_eq!(detect_format(b"not an image"), None);
    }

    #[test]
    fn test_decode_image_routes_png_to_zune() {
        let png = encode_png(3, 1);
        let (img, fmt) = decode_image(&png, &DecodeLimits::default()).unwrap();
        assert_eq!(fmt, Some(ImageFormat::Png));
        let rgb = img.to_rgb8();
        assert_eq!(rgb.get_pixel(2, 0).0, [2, 0, 7]);
    }

    #[test]
    fn test_decode_image_routes_jpeg_to_mozjpeg() {
        let jpeg = encode_with_image(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([9, 8, 7]))),
            ImageFormat::Jpeg,
        );
        let (img, fmt) = decode_image(&jpeg, &DecodeLimits::default()).unwrap();
        assert_eq!(fmt, Some(ImageFormat::Jpeg));
        assert_eq!(img.dimensions(), (2, 2));
    }

    #[test]
    fn test_decode_image_routes_bmp_to_image_crate() {
        let bmp = encode_with_image(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([40, 50, 60]))),
            ImageFormat::Bmp,
        );
        let (img, fmt) = decode_image(&bmp, &DecodeLimits::default()).unwrap();
        assert_eq!(fmt, Some(ImageFormat::Bmp));
        assert_eq!(img.to_rgb8().get_pixel(1, 1).0, [40, 50, 60]);
    }

    #[test]
    fn test_gray_jpeg_decodes_as_luma() {
        let jpeg = encode_with_image(
            DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, image::Luma([90]))),
            ImageFormat::Jpeg,
        );
        let img = decode_jpeg_mozjpeg(&jpeg, &DecodeLimits::default()).unwrap();
        assert_eq!(img.color().channel_count(), 1);
        assert_eq!(img.dimensions(), (4, 4));
    }

    #[test]
    fn test_truncated_jpeg_is_rejected() {
        let jpeg = encode_with_image(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([1, 1, 1]))),
            ImageFormat::Jpeg,
        );
        let truncated = &jpeg[..jpeg.len() / 2];
        assert!(decode_image(truncated, &DecodeLimits::default()).is_err());
    }

    #[test]
    fn test_empty_input_is_corrupted() {
        let err = decode_image(&[], &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, PixmapError::CorruptedImage));
    }
}
