// src/pipeline.rs
//
// Pipeline operations: validate, optimize and apply a queue of Operations.

use crate::error::PixmapError;
use crate::ops::Operation;
use crate::raster::Raster;
use tracing::{debug, trace};

type PipelineResult<T> = std::result::Result<T, PixmapError>;

/// Validate every operation up front so a bad parameter late in the
/// queue fails before any pixel work is done.
pub fn validate_ops(ops: &[Operation]) -> PipelineResult<()> {
    ops.iter().try_for_each(Operation::validate)
}

/// Drop operation runs that are exact no-ops:
/// - two identical flips in a row
/// - four quarter turns in a row
/// - three swirls in a row
///
/// Only exact identities are removed, so the optimized queue always
/// produces the same pixels as the queue it was given.
pub fn optimize_ops(ops: &[Operation]) -> Vec<Operation> {
    let mut out: Vec<Operation> = Vec::with_capacity(ops.len());
    for op in ops {
        out.push(op.clone());
        loop {
            let n = out.len();
            let cancels = match out.last() {
                Some(Operation::FlipH) | Some(Operation::FlipV) => {
                    n >= 2 && out[n - 2] == out[n - 1]
                }
                Some(Operation::Rotate90) => trailing_run(&out, &Operation::Rotate90) >= 4,
                Some(Operation::Swirl) => trailing_run(&out, &Operation::Swirl) >= 3,
                _ => false,
            };
            if !cancels {
                break;
            }
            let drop = match out[n - 1] {
                Operation::Rotate90 => 4,
                Operation::Swirl => 3,
                _ => 2,
            };
            out.truncate(n - drop);
        }
    }
    out
}

fn trailing_run(ops: &[Operation], op: &Operation) -> usize {
    ops.iter().rev().take_while(|o| *o == op).count()
}

/// Apply `ops` in order, returning a new raster. The input is never modified.
pub fn apply_ops(raster: &Raster, ops: &[Operation]) -> PipelineResult<Raster> {
    validate_ops(ops)?;
    let optimized = optimize_ops(ops);
    debug!(
        target: "pixmap::pipeline",
        requested = ops.len(),
        optimized = optimized.len(),
        width = raster.width(),
        height = raster.height(),
        "applying operations"
    );

    let mut img = raster.clone();
    for op in &optimized {
        img = apply_op(img, op);
        trace!(
            target: "pixmap::pipeline",
            op = op.name(),
            width = img.width(),
            height = img.height(),
            "applied"
        );
    }
    Ok(img)
}

fn apply_op(img: Raster, op: &Operation) -> Raster {
    match op {
        Operation::Resize { width, height } => {
            if (*width, *height) == img.dimensions() {
                img
            } else {
                img.resize(*width, *height)
            }
        }
        Operation::Crop {
            x,
            y,
            width,
            height,
        } => img.subimage(*x, *y, *width, *height),
        Operation::FlipH => img.flip_horizontal(),
        Operation::FlipV => img.flip_vertical(),
        Operation::Rotate90 => img.rotate90(),
        Operation::GammaCorrect { gamma } => img.gamma_correct(*gamma),
        Operation::Invert => img.invert(),
        Operation::Grayscale => img.grayscale(),
        Operation::ColorJitter { size, seed } => img.color_jitter(*size, *seed),
        Operation::ChannelShift { r, g, b } => img.channel_shift(*r, *g, *b),
        Operation::Halftone { r, g, b } => img.halftone(*r, *g, *b),
        Operation::ColorReplace {
            old,
            new,
            tolerance,
        } => img.color_replace(*old, *new, *tolerance),
        Operation::HueReplace {
            hue,
            new,
            tolerance,
        } => img.hue_replace(*hue, *new, *tolerance),
        Operation::Fill { color } => {
            let mut img = img;
            img.fill(*color);
            img
        }
        Operation::Convolve { kernel } => img.convolve(kernel).normalize(),
        Operation::Sobel => img.sobel(),
        Operation::GaussianBlur { sigma } => img.gaussian_blur(*sigma),
        Operation::Swirl => img.swirl(),
        Operation::Bitmap { size } => img.bitmap(*size),
        Operation::ExpandOutlines { iterations } => img.expand_outlines(*iterations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;
    use crate::raster::{Kernel, Offset};

    fn sample() -> Raster {
        Raster::from_fn(4, 3, |row, col| {
            Pixel::new((row * 40 + 10) as u8, (col * 30 + 5) as u8, 90)
        })
    }

    #[test]
    fn empty_queue_is_a_copy() {
        let img = sample();
        assert_eq!(apply_ops(&img, &[]).unwrap(), img);
    }

    #[test]
    fn ops_apply_in_order() {
        let img = sample();
        let out = apply_ops(
            &img,
            &[
                Operation::Crop {
                    x: 1,
                    y: 0,
                    width: 2,
                    height: 2,
                },
                Operation::Rotate90,
                Operation::Invert,
            ],
        )
        .unwrap();
        let expected = img.subimage(1, 0, 2, 2).rotate90().invert();
        assert_eq!(out, expected);
    }

    #[test]
    fn invalid_op_fails_before_any_work() {
        let img = sample();
        let err = apply_ops(
            &img,
            &[Operation::Invert, Operation::Resize { width: 0, height: 3 }],
        )
        .unwrap_err();
        assert!(matches!(err, PixmapError::InvalidResizeDimensions { .. }));
    }

    #[test]
    fn optimize_cancels_exact_identities() {
        let ops = vec![
            Operation::FlipH,
            Operation::FlipH,
            Operation::Rotate90,
            Operation::Rotate90,
            Operation::Rotate90,
            Operation::Rotate90,
            Operation::Swirl,
            Operation::Swirl,
            Operation::Swirl,
        ];
        assert!(optimize_ops(&ops).is_empty());
    }

    #[test]
    fn optimize_cascades_through_nested_pairs() {
        let ops = vec![
            Operation::FlipV,
            Operation::FlipH,
            Operation::FlipH,
            Operation::FlipV,
            Operation::Invert,
        ];
        assert_eq!(optimize_ops(&ops), vec![Operation::Invert]);
    }

    #[test]
    fn optimize_keeps_partial_runs() {
        let ops = vec![Operation::Rotate90, Operation::Rotate90, Operation::FlipH];
        assert_eq!(optimize_ops(&ops), ops);
    }

    #[test]
    fn optimized_and_unoptimized_agree() {
        let img = sample();
        let ops = vec![
            Operation::FlipH,
            Operation::Rotate90,
            Operation::Rotate90,
            Operation::FlipV,
            Operation::FlipV,
            Operation::Rotate90,
            Operation::Rotate90,
            Operation::Swirl,
        ];
        let mut manual = img.clone();
        for op in &ops {
            manual = apply_op(manual, op);
        }
        assert_eq!(apply_ops(&img, &ops).unwrap(), manual);
    }

    #[test]
    fn seeded_jitter_is_reproducible_through_pipeline() {
        let img = sample();
        let ops = [Operation::ColorJitter {
            size: 40,
            seed: Some(99),
        }];
        assert_eq!(apply_ops(&img, &ops).unwrap(), apply_ops(&img, &ops).unwrap());
    }

    #[test]
    fn convolve_and_stylize_ops_dispatch() {
        let img = sample();
        let out = apply_ops(
            &img,
            &[
                Operation::Convolve {
                    kernel: Kernel::identity(),
                },
                Operation::Halftone {
                    r: Offset::new(1, 0),
                    g: Offset::ZERO,
                    b: Offset::new(0, 1),
                },
            ],
        )
        .unwrap();
        assert_eq!(out.dimensions(), (8, 4));
    }

    #[test]
    fn fill_replaces_every_pixel() {
        let out = apply_ops(
            &sample(),
            &[Operation::Fill {
                color: Pixel::new(1, 2, 3),
            }],
        )
        .unwrap();
        assert!(out.pixels().all(|p| p == Pixel::new(1, 2, 3)));
    }
}
