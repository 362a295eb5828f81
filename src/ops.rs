// src/ops.rs
//
// Pipeline operations and output formats.
// Operations are plain data; `pipeline::apply_ops` does the work.

use crate::error::PixmapError;
use crate::pixel::Pixel;
use crate::raster::{Kernel, Offset};
use bitflags::bitflags;
use std::path::Path;
use std::str::FromStr;

bitflags! {
    /// What an operation does to the image, for callers that schedule or
    /// cache pipelines.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OperationTraits: u8 {
        /// Moves pixels without changing their values
        const GEOMETRIC = 1 << 0;
        /// Each output pixel depends only on the same input pixel
        const POINTWISE = 1 << 1;
        /// Each output pixel reads a neighbourhood of input pixels
        const NEIGHBORHOOD = 1 << 2;
        /// Output dimensions differ from input dimensions
        const RESAMPLES = 1 << 3;
        /// Output depends on a random source
        const RANDOMIZED = 1 << 4;
    }
}

/// A single-image transform that can be queued and replayed.
///
/// Each operation is self-contained: no references, no lifetimes.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Bilinear resize to exact dimensions
    Resize { width: u32, height: u32 },

    /// Crop a region; columns from `x`, rows from `y`
    Crop { x: i64, y: i64, width: u32, height: u32 },

    FlipH,
    FlipV,

    /// Quarter turn clockwise
    Rotate90,

    GammaCorrect { gamma: f32 },
    Invert,
    Grayscale,

    /// Global colour cast; `seed: None` draws from entropy
    ColorJitter { size: u32, seed: Option<u64> },

    ChannelShift { r: Offset, g: Offset, b: Offset },
    Halftone { r: Offset, g: Offset, b: Offset },

    ColorReplace { old: Pixel, new: Pixel, tolerance: u32 },
    HueReplace { hue: Pixel, new: Pixel, tolerance: u32 },

    Fill { color: Pixel },

    /// Convolve and max-normalize with an arbitrary kernel
    Convolve { kernel: Kernel },
    Sobel,
    GaussianBlur { sigma: f32 },

    Swirl,
    Bitmap { size: u32 },
    ExpandOutlines { iterations: u32 },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Resize { .. } => "resize",
            Operation::Crop { .. } => "crop",
            Operation::FlipH => "flip_horizontal",
            Operation::FlipV => "flip_vertical",
            Operation::Rotate90 => "rotate90",
            Operation::GammaCorrect { .. } => "gamma_correct",
            Operation::Invert => "invert",
            Operation::Grayscale => "grayscale",
            Operation::ColorJitter { .. } => "color_jitter",
            Operation::ChannelShift { .. } => "channel_shift",
            Operation::Halftone { .. } => "halftone",
            Operation::ColorReplace { .. } => "color_replace",
            Operation::HueReplace { .. } => "hue_replace",
            Operation::Fill { .. } => "fill",
            Operation::Convolve { .. } => "convolve",
            Operation::Sobel => "sobel",
            Operation::GaussianBlur { .. } => "gaussian_blur",
            Operation::Swirl => "swirl",
            Operation::Bitmap { .. } => "bitmap",
            Operation::ExpandOutlines { .. } => "expand_outlines",
        }
    }

    pub fn traits(&self) -> OperationTraits {
        match self {
            Operation::Resize { .. } => OperationTraits::RESAMPLES,
            Operation::Crop { .. } => OperationTraits::GEOMETRIC | OperationTraits::RESAMPLES,
            Operation::FlipH | Operation::FlipV => OperationTraits::GEOMETRIC,
            Operation::Rotate90 => OperationTraits::GEOMETRIC | OperationTraits::RESAMPLES,
            Operation::GammaCorrect { .. }
            | Operation::Invert
            | Operation::Grayscale
            | Operation::ColorReplace { .. }
            | Operation::HueReplace { .. }
            | Operation::Fill { .. }
            | Operation::Swirl => OperationTraits::POINTWISE,
            Operation::ColorJitter { .. } => {
                OperationTraits::POINTWISE | OperationTraits::RANDOMIZED
            }
            Operation::ChannelShift { .. }
            | Operation::Convolve { .. }
            | Operation::Sobel
            | Operation::GaussianBlur { .. }
            | Operation::Bitmap { .. }
            | Operation::ExpandOutlines { .. } => OperationTraits::NEIGHBORHOOD,
            Operation::Halftone { .. } => {
                OperationTraits::NEIGHBORHOOD | OperationTraits::RESAMPLES
            }
        }
    }

    /// Reject parameters that have no meaningful result.
    pub fn validate(&self) -> Result<(), PixmapError> {
        match self {
            Operation::Resize { width, height } if *width == 0 || *height == 0 => {
                Err(PixmapError::invalid_resize_dimensions(*width, *height))
            }
            Operation::Crop { width, height, .. } if *width == 0 || *height == 0 => {
                Err(PixmapError::invalid_argument(
                    "crop",
                    format!("{width}x{height}"),
                    "crop width and height must be non-zero",
                ))
            }
            Operation::GammaCorrect { gamma } if !(gamma.is_finite() && *gamma > 0.0) => {
                Err(PixmapError::invalid_argument(
                    "gamma",
                    gamma.to_string(),
                    "gamma must be a positive finite number",
                ))
            }
            Operation::GaussianBlur { sigma } if !(sigma.is_finite() && *sigma >= 0.0) => {
                Err(PixmapError::invalid_argument(
                    "sigma",
                    sigma.to_string(),
                    "sigma must be finite and non-negative",
                ))
            }
            Operation::Bitmap { size: 0 } => Err(PixmapError::invalid_argument(
                "bitmap size",
                "0",
                "cell size must be at least 1",
            )),
            _ => Ok(()),
        }
    }
}

/// Encoded file formats, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    /// Quality comes from `SaveOptions::jpeg_quality` (90 unless set)
    Jpeg,
    Bmp,
    Tga,
    /// Radiance RGBE; bytes are written as `v / 255` floats
    Hdr,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tga => "tga",
            OutputFormat::Hdr => "hdr",
        }
    }

    /// Match a bare extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Result<Self, PixmapError> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            "tga" => Ok(Self::Tga),
            "hdr" => Ok(Self::Hdr),
            other => Err(PixmapError::unsupported_format(other.to_string())),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PixmapError> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            PixmapError::unsupported_format(format!(
                "no file extension in '{}'",
                path.to_string_lossy()
            ))
        })?;
        Self::from_extension(ext)
    }
}

impl FromStr for OutputFormat {
    type Err = PixmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}
