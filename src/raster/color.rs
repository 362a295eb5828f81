// src/raster/color.rs
//
// Point-wise colour filters, plus the block-based bitmap reduction.

use super::Raster;
use crate::error::PixmapError;
use crate::pixel::Pixel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Luma threshold separating black from white cells in `bitmap`.
const BITMAP_THRESHOLD: f32 = 128.0;

impl Raster {
    /// Per channel `255 * (v / 255) ^ (1 / gamma)`, truncated.
    pub fn gamma_correct(&self, gamma: f32) -> Raster {
        let exponent = 1.0 / gamma;
        let mut lut = [0u8; 256];
        for (v, out) in lut.iter_mut().enumerate() {
            *out = ((v as f32 / 255.0).powf(exponent) * 255.0) as u8;
        }
        self.map_pixels(|p| p.map(|c| lut[c as usize]))
    }

    /// `self * (1 - alpha) + other * alpha` per pixel.
    pub fn alpha_blend(&self, other: &Raster, alpha: f32) -> Result<Raster, PixmapError> {
        self.ensure_same_dimensions(other)?;
        let mut others = other.pixels();
        Ok(self.map_pixels(|p| {
            let q = others.next().unwrap_or_default();
            p * (1.0 - alpha) + q * alpha
        }))
    }

    pub fn invert(&self) -> Raster {
        self.map_pixels(|p| p.map(|c| 255 - c))
    }

    /// Neutral gray from `0.3R + 0.59G + 0.11B`, truncated.
    pub fn grayscale(&self) -> Raster {
        self.map_pixels(|p| {
            let v = p.luma() as u8;
            Pixel::new(v, v, v)
        })
    }

    /// Add one random colour cast to the whole image. `seed: None` draws
    /// from OS entropy; pass a seed for reproducible output.
    pub fn color_jitter(&self, size: u32, seed: Option<u64>) -> Raster {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.color_jitter_with_rng(size, &mut rng)
    }

    /// Draw a delta uniformly from [0, 255) per channel, scale it by
    /// `size / 255` and add it (saturating) to every pixel.
    pub fn color_jitter_with_rng<R: Rng + ?Sized>(&self, size: u32, rng: &mut R) -> Raster {
        let delta = Pixel::new(
            rng.gen_range(0..255),
            rng.gen_range(0..255),
            rng.gen_range(0..255),
        );
        let delta = jitter_delta(delta, size);
        self.map_pixels(|p| p + delta)
    }

    /// Swap every pixel within Euclidean RGB distance `tolerance` of
    /// `old_color` for `new_color`.
    pub fn color_replace(&self, old_color: Pixel, new_color: Pixel, tolerance: u32) -> Raster {
        self.color_replace_with(old_color, new_color, tolerance, 1.0)
    }

    /// Soft variant of `color_replace`: matching pixels become
    /// `p * (1 - blend) + new_color * blend`.
    pub fn color_replace_with(
        &self,
        old_color: Pixel,
        new_color: Pixel,
        tolerance: u32,
        blend: f32,
    ) -> Raster {
        let tolerance = tolerance as f32;
        self.map_pixels(|p| {
            if p.distance(old_color) <= tolerance {
                p * (1.0 - blend) + new_color * blend
            } else {
                p
            }
        })
    }

    /// Replace every pixel whose hue lies within `tolerance` degrees of the
    /// hue of `hue`. Achromatic pixels have no hue and never match.
    pub fn hue_replace(&self, hue: Pixel, new_color: Pixel, tolerance: u32) -> Raster {
        let Some(target) = hue.hue() else {
            return self.clone();
        };
        let tolerance = tolerance as f32;
        self.map_pixels(|p| match p.hue() {
            Some(h) if hue_distance(h, target) <= tolerance => new_color,
            _ => p,
        })
    }

    /// Set every pixel to `color`, in place.
    pub fn fill(&mut self, color: Pixel) {
        let rgb = color.to_array();
        for chunk in self.data.chunks_exact_mut(super::CHANNELS) {
            chunk.copy_from_slice(&rgb);
        }
    }

    /// Rotate colour channels: red takes green, green takes blue, blue takes red.
    pub fn swirl(&self) -> Raster {
        self.map_pixels(|p| Pixel::new(p.g, p.b, p.r))
    }

    /// One-bit reduction over `size` x `size` cells: each cell becomes white
    /// when its mean luma reaches the midpoint, black otherwise. `size` 0 is
    /// treated as 1.
    pub fn bitmap(&self, size: u32) -> Raster {
        let size = size.max(1);
        let mut result = Raster::new(self.width, self.height);

        for cell_row in (0..self.height).step_by(size as usize) {
            for cell_col in (0..self.width).step_by(size as usize) {
                let row_end = (cell_row + size).min(self.height);
                let col_end = (cell_col + size).min(self.width);

                let mut total = 0.0f32;
                for row in cell_row..row_end {
                    for col in cell_col..col_end {
                        total += self.get(row as i64, col as i64).luma();
                    }
                }
                let count = ((row_end - cell_row) * (col_end - cell_col)) as f32;
                let color = if total / count >= BITMAP_THRESHOLD {
                    Pixel::WHITE
                } else {
                    Pixel::BLACK
                };

                for row in cell_row..row_end {
                    for col in cell_col..col_end {
                        result.set(row as i64, col as i64, color);
                    }
                }
            }
        }
        result
    }
}

/// Shortest angular distance between two hues, in degrees.
/// Scale a raw `[0, 255)` draw by `size / 255` in float. Dividing the pixel
/// by 255 first would round every channel to 0 or 1 and leave only 0 or `size`.
fn jitter_delta(raw: Pixel, size: u32) -> Pixel {
    let scale = size as f32 / 255.0;
    raw.map(|c| (c as f32 * scale).round() as u8)
}

fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}
