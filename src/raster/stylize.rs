// src/raster/stylize.rs
//
// Print-style effects: per-channel misregistration, halftone dots and
// outline growth.

use super::Raster;
use crate::pixel::Pixel;

/// Downsampling factor applied before dots are stamped.
pub const HALFTONE_SCALE: f32 = 0.5;

/// Side length in output pixels of the cell each dot occupies.
pub const HALFTONE_ENLARGE: u32 = 4;

/// A 2D displacement in pixels; positive `x` reads from the right,
/// positive `y` reads from below.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Offset {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

// 4-neighbourhood, visited in this order
const NEIGHBOURS: [(i64, i64); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

impl Raster {
    /// Source each channel from its own displaced position:
    /// `out.r = get(row + r.y, col + r.x).r`, likewise for green and blue.
    /// Reads past the edge contribute 0.
    pub fn channel_shift(&self, r: Offset, g: Offset, b: Offset) -> Raster {
        let mut result = Raster::new(self.width, self.height);
        for row in 0..self.height as i64 {
            for col in 0..self.width as i64 {
                let p = Pixel::new(
                    self.get(row + r.y as i64, col + r.x as i64).r,
                    self.get(row + g.y as i64, col + g.x as i64).g,
                    self.get(row + b.y as i64, col + b.x as i64).b,
                );
                result.set(row, col, p);
            }
        }
        result
    }

    /// Halftone print emulation: downsample by `HALFTONE_SCALE`, stamp one
    /// filled dot per sample into a `HALFTONE_ENLARGE`-pixel cell on a black
    /// canvas, then misregister the channels with `channel_shift`.
    pub fn halftone(&self, r: Offset, g: Offset, b: Offset) -> Raster {
        let small_w = ((self.width as f32 * HALFTONE_SCALE) as u32).max(1);
        let small_h = ((self.height as f32 * HALFTONE_SCALE) as u32).max(1);
        let small = if self.is_empty() {
            Raster::new(0, 0)
        } else {
            self.resize(small_w, small_h)
        };

        let cell = HALFTONE_ENLARGE;
        let mut canvas = Raster::new(small.width * cell, small.height * cell);
        let radius = cell as f32 / 2.0;

        for row in 0..small.height {
            for col in 0..small.width {
                let color = small.get(row as i64, col as i64);
                for dy in 0..cell {
                    for dx in 0..cell {
                        let fx = dx as f32 + 0.5 - radius;
                        let fy = dy as f32 + 0.5 - radius;
                        if fx * fx + fy * fy <= radius * radius {
                            canvas.set((row * cell + dy) as i64, (col * cell + dx) as i64, color);
                        }
                    }
                }
            }
        }

        canvas.channel_shift(r, g, b)
    }

    /// Grow coloured regions into black space. Each iteration gives every
    /// black pixel the colour of its first non-black 4-neighbour (up, left,
    /// right, down) as of the previous iteration. Stops early once nothing
    /// changes.
    pub fn expand_outlines(&self, iterations: u32) -> Raster {
        let mut current = self.clone();
        for _ in 0..iterations {
            let mut next = current.clone();
            let mut changed = false;
            for row in 0..current.height as i64 {
                for col in 0..current.width as i64 {
                    if current.get(row, col) != Pixel::BLACK {
                        continue;
                    }
                    let fill = NEIGHBOURS
                        .iter()
                        .map(|&(dy, dx)| current.get(row + dy, col + dx))
                        .find(|p| *p != Pixel::BLACK);
                    if let Some(color) = fill {
                        next.set(row, col, color);
                        changed = true;
                    }
                }
            }
            current = next;
            if !changed {
                break;
            }
        }
        current
    }
}
