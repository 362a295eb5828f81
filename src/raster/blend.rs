// src/raster/blend.rs
//
// Pairwise combinators over two same-sized rasters.

use super::Raster;
use crate::error::PixmapError;
use crate::pixel::Pixel;

impl Raster {
    fn combine(
        &self,
        other: &Raster,
        f: impl Fn(Pixel, Pixel) -> Pixel,
    ) -> Result<Raster, PixmapError> {
        self.ensure_same_dimensions(other)?;
        let mut others = other.pixels();
        Ok(self.map_pixels(|p| f(p, others.next().unwrap_or_default())))
    }

    /// Channel-wise sum, saturating at 255.
    pub fn add(&self, other: &Raster) -> Result<Raster, PixmapError> {
        self.combine(other, |a, b| a + b)
    }

    /// Channel-wise `self - other`, saturating at 0.
    pub fn subtract(&self, other: &Raster) -> Result<Raster, PixmapError> {
        self.combine(other, |a, b| a - b)
    }

    /// Multiply blend: `a * b / 255` per channel, so white is the identity.
    /// This is not the raw byte product.
    pub fn multiply(&self, other: &Raster) -> Result<Raster, PixmapError> {
        self.combine(other, |a, b| a * b)
    }

    pub fn difference(&self, other: &Raster) -> Result<Raster, PixmapError> {
        self.combine(other, Pixel::abs_diff)
    }

    pub fn lightest(&self, other: &Raster) -> Result<Raster, PixmapError> {
        self.combine(other, Pixel::max)
    }

    pub fn darkest(&self, other: &Raster) -> Result<Raster, PixmapError> {
        self.combine(other, Pixel::min)
    }
}
