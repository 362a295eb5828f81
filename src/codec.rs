// src/codec.rs
//
// Codec collaborator: bytes or files in, Raster out, and back again.
//
// Decoding always yields 3-channel 8-bit RGB regardless of the source
// layout (gray, gray+alpha, RGBA, 16-bit, float). Encoding dispatches on
// the output file extension.

mod common;
mod decoder;
mod encoder;

pub use decoder::detect_format;

// Individual decoder paths, exposed so fuzz targets can hit each one directly
#[cfg(feature = "fuzzing")]
pub use decoder::{decode_jpeg_mozjpeg, decode_png_zune, decode_with_image_crate};

use crate::config::{LoadOptions, SaveOptions};
use crate::error::{FileAction, PixmapError};
use crate::ops::OutputFormat;
use crate::raster::Raster;
use image::{ImageFormat, ImageReader};
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// A decoded image plus what the source looked like before RGB conversion.
#[derive(Clone, Debug)]
pub struct Decoded {
    pub raster: Raster,
    /// Channel count of the source (1 gray, 2 gray+alpha, 3 RGB, 4 RGBA)
    pub source_channels: u8,
    /// Container format detected from magic bytes, when recognised
    pub format: Option<ImageFormat>,
}

/// Header facts read without decoding pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageFormat>,
}

/// Read dimensions and format from the header only.
pub fn inspect(bytes: &[u8]) -> Result<ImageInfo, PixmapError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PixmapError::decode_failed(format!("failed to read image header: {e}")))?;
    let format = reader.format();
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| PixmapError::decode_failed(format!("failed to read dimensions: {e}")))?;
    Ok(ImageInfo {
        width,
        height,
        format,
    })
}

/// Decode an in-memory image.
pub fn decode(bytes: &[u8], options: &LoadOptions) -> Result<Decoded, PixmapError> {
    let (img, format) = decoder::decode_image(bytes, &options.limits)?;
    let source_channels = img.color().channel_count();
    let rgb = img.into_rgb8();
    let (width, height) = rgb.dimensions();
    let mut raster = Raster::from_raw(width, height, rgb.into_raw())?;
    if options.flip_vertical {
        raster = raster.flip_vertical();
    }
    Ok(Decoded {
        raster,
        source_channels,
        format,
    })
}

/// Memory-map and decode the file at `path`.
pub fn decode_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Decoded, PixmapError> {
    let path = path.as_ref();
    let shown = path.to_string_lossy().into_owned();

    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PixmapError::file_not_found(shown.clone()),
        _ => PixmapError::file(FileAction::Open, shown.clone(), e),
    })?;

    // Safety: the mapping is read-only and dropped before returning. A file
    // truncated by another process while mapped is outside our control.
    let mmap = unsafe { Mmap::map(&file) }
        .map_err(|e| PixmapError::file(FileAction::Map, shown.clone(), e))?;

    debug!(target: "pixmap::codec", path = %shown, len = mmap.len(), "loading");
    decode(&mmap, options)
}

/// Encode `raster` as `format`, honouring the flip flag and quality settings.
pub fn encode(
    raster: &Raster,
    format: OutputFormat,
    options: &SaveOptions,
) -> Result<Vec<u8>, PixmapError> {
    let source: Cow<'_, Raster> = if options.flip_vertical {
        Cow::Owned(raster.flip_vertical())
    } else {
        Cow::Borrowed(raster)
    };
    encoder::encode(&source, format, options.jpeg_quality, options.optimize_png)
}

/// Encode to the format named by `path`'s extension and write the file.
pub fn encode_file(
    raster: &Raster,
    path: impl AsRef<Path>,
    options: &SaveOptions,
) -> Result<(), PixmapError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    let bytes = encode(raster, format, options)?;
    std::fs::write(path, bytes)
        .map_err(|e| PixmapError::file(FileAction::Write, path.to_string_lossy().into_owned(), e))
}

impl Raster {
    /// Load an image file as RGB.
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Raster, PixmapError> {
        decode_file(path, options).map(|d| d.raster)
    }

    /// Decode an in-memory image as RGB.
    pub fn from_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Raster, PixmapError> {
        decode(bytes, options).map(|d| d.raster)
    }

    /// Write to `path`; the extension picks the format.
    pub fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<(), PixmapError> {
        encode_file(self, path, options)
    }

    pub fn encode(&self, format: OutputFormat, options: &SaveOptions) -> Result<Vec<u8>, PixmapError> {
        encode(self, format, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    fn png_of(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn inspect_reads_header_only() {
        let png = png_of(DynamicImage::ImageLuma8(GrayImage::new(7, 3)));
        let info = inspect(&png).unwrap();
        assert_eq!((info.width, info.height), (7, 3));
        assert_eq!(info.format, Some(ImageFormat::Png));
        assert!(inspect(b"nope").is_err());
    }

    #[test]
    fn gray_source_is_expanded_to_rgb() {
        let png = png_of(DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([77]))));
        let decoded = decode(&png, &LoadOptions::default()).unwrap();
        assert_eq!(decoded.source_channels, 1);
        assert_eq!(decoded.format, Some(ImageFormat::Png));
        assert_eq!(decoded.raster.get(1, 1), Pixel::new(77, 77, 77));
        assert_eq!(decoded.raster.data().len(), 2 * 2 * 3);
    }

    #[test]
    fn gray_jpeg_reports_one_source_channel() {
        let mut jpeg = Vec::new();
        DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([120])))
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        let decoded = decode(&jpeg, &LoadOptions::default()).unwrap();
        assert_eq!(decoded.format, Some(ImageFormat::Jpeg));
        assert_eq!(decoded.source_channels, 1);
        let p = decoded.raster.get(4, 4);
        assert!(p.r == p.g && p.g == p.b);
    }

    #[test]
    fn rgba_source_drops_alpha() {
        let png = png_of(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            1,
            1,
            Rgba([10, 20, 30, 0]),
        )));
        let decoded = decode(&png, &LoadOptions::default()).unwrap();
        assert_eq!(decoded.source_channels, 4);
        assert_eq!(decoded.raster.get(0, 0), Pixel::new(10, 20, 30));
    }

    #[test]
    fn flip_on_load_and_save() {
        let img = Raster::from_fn(1, 2, |row, _| if row == 0 { Pixel::WHITE } else { Pixel::BLACK });
        let bytes = img.encode(OutputFormat::Png, &SaveOptions::flipped()).unwrap();
        let stored = Raster::from_bytes(&bytes, &LoadOptions::default()).unwrap();
        assert_eq!(stored, img.flip_vertical());
        let restored = Raster::from_bytes(&bytes, &LoadOptions::flipped()).unwrap();
        assert_eq!(restored, img);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Raster::load("/definitely/not/here.png", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, PixmapError::FileNotFound { .. }));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = Raster::from_bytes(b"this is not an image", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, PixmapError::DecodeFailed { .. }));
    }
}
