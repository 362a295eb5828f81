#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use pixmap::{apply_ops, Kernel, Offset, Operation, Pixel, Raster};

#[derive(Arbitrary, Debug)]
struct OperationSeed {
    kind: u8,
    a: i32,
    b: i32,
    c: i32,
    d: i32,
    color: [u8; 3],
    value: f32,
}

fn build_image(data: &[u8]) -> Raster {
    let width = data.first().copied().unwrap_or(0) as u32 % 64 + 1;
    let height = data.get(1).copied().unwrap_or(0) as u32 % 64 + 1;
    Raster::from_fn(width, height, |row, col| {
        let i = (row * width + col) as usize * 3;
        Pixel::new(
            data[i % data.len()],
            data[(i + 1) % data.len()],
            data[(i + 2) % data.len()],
        )
    })
}

fn offset(a: i32, b: i32) -> Offset {
    Offset::new(a % 16, b % 16)
}

fn seeds_to_ops(seeds: Vec<OperationSeed>) -> Vec<Operation> {
    seeds
        .into_iter()
        .take(8)
        .map(|seed| {
            let color = Pixel::from(seed.color);
            match seed.kind % 20 {
                0 => Operation::Resize {
                    width: seed.a.clamp(0, 256) as u32,
                    height: seed.b.clamp(0, 256) as u32,
                },
                1 => Operation::Crop {
                    x: seed.a as i64,
                    y: seed.b as i64,
                    width: seed.c.clamp(0, 256) as u32,
                    height: seed.d.clamp(0, 256) as u32,
                },
                2 => Operation::FlipH,
                3 => Operation::FlipV,
                4 => Operation::Rotate90,
                5 => Operation::GammaCorrect { gamma: seed.value },
                6 => Operation::Invert,
                7 => Operation::Grayscale,
                8 => Operation::ColorJitter {
                    size: seed.a.unsigned_abs() % 256,
                    seed: Some(seed.b as u64),
                },
                9 => Operation::ChannelShift {
                    r: offset(seed.a, seed.b),
                    g: offset(seed.b, seed.c),
                    b: offset(seed.c, seed.d),
                },
                10 => Operation::Halftone {
                    r: offset(seed.a, seed.b),
                    g: offset(seed.b, seed.c),
                    b: offset(seed.c, seed.d),
                },
                11 => Operation::ColorReplace {
                    old: color,
                    new: Pixel::new(seed.a as u8, seed.b as u8, seed.c as u8),
                    tolerance: seed.d.unsigned_abs() % 442,
                },
                12 => Operation::HueReplace {
                    hue: color,
                    new: Pixel::WHITE,
                    tolerance: seed.d.unsigned_abs() % 360,
                },
                13 => Operation::Fill { color },
                14 => Operation::Sobel,
                15 => Operation::GaussianBlur {
                    // Keep kernels small enough to finish quickly
                    sigma: seed.value.clamp(-1.0, 3.0),
                },
                16 => Operation::Swirl,
                17 => Operation::Bitmap {
                    size: seed.a.unsigned_abs() % 16,
                },
                18 => Operation::ExpandOutlines {
                    iterations: seed.a.unsigned_abs() % 8,
                },
                _ => Operation::Convolve {
                    kernel: Kernel::new(3, vec![seed.value; 9]).unwrap_or_else(|_| Kernel::identity()),
                },
            }
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut unstructured = Unstructured::new(data);
    let seeds: Vec<OperationSeed> = match Vec::arbitrary(&mut unstructured) {
        Ok(v) => v,
        Err(_) => return,
    };

    let ops = seeds_to_ops(seeds);
    let img = build_image(data);
    // Invalid parameters are expected to error; we only care about panics
    let _ = apply_ops(&img, &ops);
});
