#![no_main]

//! Fuzz target for image encoding to every output format.
//! Tests JPEG (mozjpeg), PNG (image + oxipng), BMP, TGA and HDR paths for crashes.

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use pixmap::{OutputFormat, Raster, SaveOptions};

#[derive(Arbitrary, Debug)]
struct EncodeSeed {
    format: u8,
    quality: u8,
    width: u8,
    height: u8,
    flip: bool,
    optimize: bool,
}

fn build_image(data: &[u8], width: u8, height: u8) -> Raster {
    // Limit dimensions to avoid OOM (max 128x128 RGB)
    let w = width as u32 % 128;
    let h = height as u32 % 128;
    let len = (w * h * 3) as usize;
    let buffer: Vec<u8> = (0..len)
        .map(|i| data.get(i % data.len().max(1)).copied().unwrap_or(128))
        .collect();
    Raster::from_raw(w, h, buffer).unwrap_or_default()
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let mut unstructured = Unstructured::new(data);
    let seed: EncodeSeed = match EncodeSeed::arbitrary(&mut unstructured) {
        Ok(s) => s,
        Err(_) => return,
    };

    // Zero-sized images are allowed through; they must fail cleanly
    let img = build_image(data, seed.width, seed.height);
    let format = match seed.format % 5 {
        0 => OutputFormat::Jpeg,
        1 => OutputFormat::Png,
        2 => OutputFormat::Bmp,
        3 => OutputFormat::Tga,
        _ => OutputFormat::Hdr,
    };
    let options = SaveOptions {
        flip_vertical: seed.flip,
        jpeg_quality: seed.quality,
        optimize_png: seed.optimize,
    };

    let _ = img.encode(format, &options);
});
