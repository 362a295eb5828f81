// src/raster/geometry.rs
//
// Geometric remapping: flips, quarter-turn rotation, crop and paste.

use super::Raster;

impl Raster {
    /// Mirror columns (left <-> right).
    pub fn flip_horizontal(&self) -> Raster {
        let (w, h) = (self.width as i64, self.height as i64);
        let mut result = Raster::new(self.width, self.height);
        for row in 0..h {
            for col in 0..w {
                result.set(row, col, self.get(row, w - col - 1));
            }
        }
        result
    }

    /// Mirror rows (top <-> bottom).
    pub fn flip_vertical(&self) -> Raster {
        let (w, h) = (self.width as i64, self.height as i64);
        let mut result = Raster::new(self.width, self.height);
        for row in 0..h {
            // Whole rows move, so copy them as slices
            let src = (h - row - 1) as usize * w as usize * super::CHANNELS;
            let dst = row as usize * w as usize * super::CHANNELS;
            let len = w as usize * super::CHANNELS;
            result.data[dst..dst + len].copy_from_slice(&self.data[src..src + len]);
        }
        result
    }

    /// Rotate 90 degrees clockwise. Width and height swap.
    pub fn rotate90(&self) -> Raster {
        let (w, h) = (self.width as i64, self.height as i64);
        let mut result = Raster::new(self.height, self.width);
        for row in 0..h {
            for col in 0..w {
                result.set(col, h - row - 1, self.get(row, col));
            }
        }
        result
    }

    /// Crop `w` x `h` starting at column `x`, row `y`. Pixels outside the
    /// source read as black.
    pub fn subimage(&self, x: i64, y: i64, w: u32, h: u32) -> Raster {
        let mut sub = Raster::new(w, h);
        for row in 0..h as i64 {
            for col in 0..w as i64 {
                sub.set(row, col, self.get(row.saturating_add(y), col.saturating_add(x)));
            }
        }
        sub
    }

    /// Paste `image` with its top-left corner at column `x`, row `y`.
    /// Whatever falls outside this raster is clipped.
    pub fn replace(&mut self, image: &Raster, x: i64, y: i64) {
        for row in 0..image.height as i64 {
            for col in 0..image.width as i64 {
                self.set(row.saturating_add(y), col.saturating_add(x), image.get(row, col));
            }
        }
    }
}
