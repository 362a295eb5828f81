// lib.rs
//
// pixmap: an in-memory RGB raster transform library
//
// Design goals:
// - One owned, row-major, 3-channel 8-bit buffer per image
// - Every transform returns a fresh image; only a few setters mutate
// - Reads outside the grid are black, writes outside are dropped
// - Load/save are the only operations that can fail on external input

pub mod codec;
pub mod config;
pub mod error;
pub mod ops;
pub mod pipeline;
pub mod pixel;
pub mod raster;

pub use codec::{decode, decode_file, encode, encode_file, inspect, Decoded, ImageInfo};
pub use config::{DecodeLimits, LoadOptions, SaveOptions, MAX_DIMENSION, MAX_PIXELS};
pub use error::{ErrorCategory, FileAction, PixmapError, Result};
pub use ops::{Operation, OperationTraits, OutputFormat};
pub use pipeline::apply_ops;
pub use pixel::Pixel;
pub use raster::{ConvolutionBuffer, Kernel, Offset, Raster, SamplingMethod, MAX_GAUSSIAN_SIZE};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Input formats the decoder routes explicitly
pub fn supported_input_formats() -> &'static [&'static str] {
    &["jpeg", "jpg", "png", "bmp", "tga", "hdr"]
}

/// File extensions `Raster::save` accepts
pub fn supported_output_formats() -> &'static [&'static str] {
    &["jpeg", "jpg", "png", "bmp", "tga", "hdr"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_advertised_output_format_parses() {
        for ext in supported_output_formats() {
            assert!(OutputFormat::from_extension(ext).is_ok(), "{ext}");
        }
    }

    #[test]
    fn version_matches_manifest() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
