// src/raster/convolve.rs
//
// Square-kernel convolution into an unclamped float buffer, plus the
// max-only normalization that turns it back into bytes.
//
// Normalization divides by the global maximum only. The minimum is tracked
// and exposed but never subtracted, so negative responses clamp to zero.

use super::{Raster, CHANNELS};
use crate::error::PixmapError;

/// Largest side `Kernel::gaussian` will generate.
pub const MAX_GAUSSIAN_SIZE: usize = 1025;

/// Horizontal Sobel operator.
const SOBEL_X: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];

/// A square, odd-sized convolution kernel stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    pub fn new(size: usize, weights: Vec<f32>) -> Result<Self, PixmapError> {
        if size % 2 == 0 || size.checked_mul(size) != Some(weights.len()) {
            return Err(PixmapError::invalid_kernel(size, weights.len()));
        }
        Ok(Self { size, weights })
    }

    /// The 1x1 kernel `[1]`.
    pub fn identity() -> Self {
        Self {
            size: 1,
            weights: vec![1.0],
        }
    }

    pub fn sobel_x() -> Self {
        Self {
            size: 3,
            weights: SOBEL_X.to_vec(),
        }
    }

    /// Normalized 2D Gaussian. Side is `ceil(6 * sigma)` forced odd and at
    /// most `MAX_GAUSSIAN_SIZE`; `sigma <= 0` or NaN gives the identity kernel.
    pub fn gaussian(sigma: f32) -> Self {
        Self::gaussian_clipped(sigma, MAX_GAUSSIAN_SIZE)
    }

    /// Like `gaussian`, with the side capped at `max_size` (rounded up to odd).
    /// Weights past the cap are dropped and the rest renormalized. An infinite
    /// sigma yields a flat box of the capped size.
    pub fn gaussian_clipped(sigma: f32, max_size: usize) -> Self {
        if !(sigma > 0.0) {
            return Self::identity();
        }

        let cap = max_size | 1;
        // 6 sigma covers 99.7% of the distribution
        let wanted = (f64::from(sigma) * 6.0).ceil();
        let size = if wanted < cap as f64 {
            (wanted as usize) | 1
        } else {
            cap
        };
        let half = (size / 2) as f32;
        let two_sigma_sq = 2.0 * sigma * sigma;

        let mut weights = Vec::with_capacity(size * size);
        for ky in 0..size {
            for kx in 0..size {
                let dy = ky as f32 - half;
                let dx = kx as f32 - half;
                weights.push((-(dx * dx + dy * dy) / two_sigma_sq).exp());
            }
        }

        let sum: f32 = weights.iter().sum();
        for w in weights.iter_mut() {
            *w /= sum;
        }

        Self { size, weights }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn padding(&self) -> usize {
        (self.size - 1) / 2
    }
}

/// Unclamped RGB float output of `Raster::convolve`, same pixel count as
/// the source.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvolutionBuffer {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl ConvolutionBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved RGB floats, row-major.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, row: u32, col: u32) -> Option<[f32; 3]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let i = (row as usize * self.width as usize + col as usize) * CHANNELS;
        Some([self.values[i], self.values[i + 1], self.values[i + 2]])
    }

    /// Largest value across all channels (`f32::NEG_INFINITY` when empty).
    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Smallest value across all channels (`f32::INFINITY` when empty).
    pub fn min(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Scale every value by `255 / max`, round and clamp into bytes.
    /// A buffer with no positive value normalizes to black.
    pub fn normalize(&self) -> Raster {
        let max = self.max();
        let mut result = Raster::new(self.width, self.height);
        if !(max > 0.0) {
            return result;
        }

        let scale = 255.0 / max;
        for (dst, &v) in result.data.iter_mut().zip(&self.values) {
            *dst = (v * scale).round().clamp(0.0, 255.0) as u8;
        }
        result
    }
}

impl Raster {
    /// Convolve every channel with `kernel`, zero-padding at the edges.
    pub fn convolve(&self, kernel: &Kernel) -> ConvolutionBuffer {
        let pad = kernel.padding() as i64;
        let k = kernel.size();
        let mut values = vec![0.0f32; self.pixel_count() * CHANNELS];

        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                let mut sum = [0.0f32; 3];
                for ky in 0..k {
                    for kx in 0..k {
                        let weight = kernel.weights[ky * k + kx];
                        if weight == 0.0 {
                            continue;
                        }
                        let p = self.get(y + ky as i64 - pad, x + kx as i64 - pad);
                        sum[0] += weight * p.r as f32;
                        sum[1] += weight * p.g as f32;
                        sum[2] += weight * p.b as f32;
                    }
                }
                let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
                values[i..i + CHANNELS].copy_from_slice(&sum);
            }
        }

        ConvolutionBuffer {
            width: self.width,
            height: self.height,
            values,
        }
    }

    /// Horizontal Sobel edge response, normalized.
    pub fn sobel(&self) -> Raster {
        self.convolve(&Kernel::sobel_x()).normalize()
    }

    /// Gaussian blur, normalized like `sobel`.
    ///
    /// The kernel never reaches past the image: beyond `2 * max(w, h) + 1`
    /// every tap lands in the zero padding, and the uniform rescale of the
    /// remaining weights is undone by normalization.
    pub fn gaussian_blur(&self, sigma: f32) -> Raster {
        let reach = 2 * self.width.max(self.height) as usize + 1;
        let kernel = Kernel::gaussian_clipped(sigma, reach.min(MAX_GAUSSIAN_SIZE));
        self.convolve(&kernel).normalize()
    }
}
