// src/config.rs
//
// Load/save configuration and decode size limits.

use crate::error::PixmapError;

/// Maximum allowed image dimension (width or height).
/// Larger images are rejected to prevent decompression bombs.
pub const MAX_DIMENSION: u32 = 32768;

/// Maximum allowed total pixels (width * height).
/// 100 megapixels = 300MB of RGB. Beyond this is likely malicious.
pub const MAX_PIXELS: u64 = 100_000_000;

const STRICT_MAX_DIMENSION: u32 = 8192;
const STRICT_MAX_PIXELS: u64 = 40_000_000; // ~8K x 5K

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Size limits enforced around decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_dimension: u32,
    pub max_pixels: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            max_pixels: MAX_PIXELS,
        }
    }
}

impl DecodeLimits {
    pub fn strict() -> Self {
        Self {
            max_dimension: STRICT_MAX_DIMENSION,
            max_pixels: STRICT_MAX_PIXELS,
        }
    }

    pub fn unlimited() -> Self {
        Self {
            max_dimension: u32::MAX,
            max_pixels: u64::MAX,
        }
    }

    /// Check if image dimensions are within these limits.
    pub fn check(&self, width: u32, height: u32) -> Result<(), PixmapError> {
        if width > self.max_dimension || height > self.max_dimension {
            return Err(PixmapError::dimension_exceeds_limit(
                width.max(height),
                self.max_dimension,
            ));
        }
        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(PixmapError::pixel_count_exceeds_limit(
                pixels,
                self.max_pixels,
            ));
        }
        Ok(())
    }
}

/// Options for `Raster::load` / `Raster::from_bytes`.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Flip rows after decoding (bottom-up consumers such as GL textures)
    pub flip_vertical: bool,
    pub limits: DecodeLimits,
}

impl LoadOptions {
    pub fn flipped() -> Self {
        Self {
            flip_vertical: true,
            ..Self::default()
        }
    }

    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Options for `Raster::save` / `Raster::encode`.
#[derive(Clone, Debug)]
pub struct SaveOptions {
    /// Flip rows before encoding
    pub flip_vertical: bool,
    /// JPEG quality (0-100)
    pub jpeg_quality: u8,
    /// Recompress PNG output with oxipng (lossless, slower)
    pub optimize_png: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            flip_vertical: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            optimize_png: false,
        }
    }
}

impl SaveOptions {
    pub fn flipped() -> Self {
        Self {
            flip_vertical: true,
            ..Self::default()
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.min(100);
        self
    }

    pub fn with_optimize_png(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_accept_small_image() {
        assert!(DecodeLimits::default().check(64, 64).is_ok());
    }

    #[test]
    fn limits_reject_large_dimension() {
        let err = DecodeLimits::default().check(MAX_DIMENSION + 1, 1).unwrap_err();
        assert!(matches!(err, PixmapError::DimensionExceedsLimit { .. }));
    }

    #[test]
    fn strict_limits_reject_pixel_count() {
        let err = DecodeLimits::strict().check(8000, 8000).unwrap_err();
        assert!(matches!(err, PixmapError::PixelCountExceedsLimit { .. }));
    }

    #[test]
    fn unlimited_accepts_anything() {
        assert!(DecodeLimits::unlimited().check(u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn save_options_default_quality() {
        let opts = SaveOptions::default();
        assert_eq!(opts.jpeg_quality, 90);
        assert!(!opts.flip_vertical);
        assert_eq!(SaveOptions::default().with_jpeg_quality(150).jpeg_quality, 100);
    }
}
