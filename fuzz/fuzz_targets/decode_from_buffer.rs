#![no_main]

use image::ImageFormat;
use libfuzzer_sys::fuzz_target;
use pixmap::codec::{decode_jpeg_mozjpeg, decode_png_zune, decode_with_image_crate};
use pixmap::{DecodeLimits, LoadOptions, Raster};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Keep allocations small; we're looking for panics, not OOM
    let limits = DecodeLimits {
        max_dimension: 4096,
        max_pixels: 4_000_000,
    };

    let _ = Raster::from_bytes(data, &LoadOptions::default().with_limits(limits));

    // Each decoder path must reject foreign input without panicking
    let _ = decode_jpeg_mozjpeg(data, &limits);
    let _ = decode_png_zune(data, &limits);
    let _ = decode_with_image_crate(data, ImageFormat::Tga, &limits);
    let _ = decode_with_image_crate(data, ImageFormat::Bmp, &limits);
});
