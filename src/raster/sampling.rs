// src/raster/sampling.rs
//
// Fractional-coordinate sampling and bilinear resize.

use super::Raster;
use crate::error::PixmapError;
use crate::pixel::Pixel;
use std::str::FromStr;
use tracing::warn;

/// Resampling policy for `Raster::get_rel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SamplingMethod {
    Nearest,
    #[default]
    Bilinear,
}

impl SamplingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingMethod::Nearest => "nearest",
            SamplingMethod::Bilinear => "bilinear",
        }
    }
}

impl FromStr for SamplingMethod {
    type Err = PixmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            other => Err(PixmapError::invalid_argument(
                "method",
                other.to_string(),
                "expected nearest or bilinear",
            )),
        }
    }
}

impl Raster {
    /// Sample at a fractional position, `y_pct`/`x_pct` in [0, 1).
    pub fn get_rel(&self, y_pct: f32, x_pct: f32, method: SamplingMethod) -> Pixel {
        match method {
            SamplingMethod::Nearest => {
                let row = (y_pct * self.height as f32).round() as i64;
                let col = (x_pct * self.width as f32).round() as i64;
                self.get(row, col)
            }
            SamplingMethod::Bilinear => self.sample_bilinear(y_pct, x_pct),
        }
    }

    /// Like `get_rel`, with the method given by name. Unknown names log a
    /// warning and sample as black.
    pub fn get_rel_named(&self, y_pct: f32, x_pct: f32, method: &str) -> Pixel {
        match method.parse::<SamplingMethod>() {
            Ok(m) => self.get_rel(y_pct, x_pct, m),
            Err(err) => {
                warn!(target: "pixmap::sampling", %err, "not a sampling method");
                Pixel::BLACK
            }
        }
    }

    fn sample_bilinear(&self, y_pct: f32, x_pct: f32) -> Pixel {
        let y = y_pct * self.height as f32;
        let x = x_pct * self.width as f32;

        let x1 = x.floor();
        let x2 = x.ceil();
        let y1 = y.floor();
        let y2 = y.ceil();

        let q11 = self.get(y1 as i64, x1 as i64);
        let q12 = self.get(y1 as i64, x2 as i64);
        let q21 = self.get(y2 as i64, x1 as i64);
        let q22 = self.get(y2 as i64, x2 as i64);

        // On a grid line the weights would divide by zero; take the sample as-is.
        let (p1, p2) = if x1 == x2 {
            (q11, q21)
        } else {
            (
                q11 * (x2 - x) + q12 * (x - x1),
                q21 * (x2 - x) + q22 * (x - x1),
            )
        };

        if y1 == y2 {
            p1
        } else {
            p1 * (y2 - y) + p2 * (y - y1)
        }
    }

    /// Resize to `width` x `height` with bilinear sampling.
    pub fn resize(&self, width: u32, height: u32) -> Raster {
        let mut result = Raster::new(width, height);
        for row in 0..height {
            for col in 0..width {
                let p = self.get_rel(
                    row as f32 / height as f32,
                    col as f32 / width as f32,
                    SamplingMethod::Bilinear,
                );
                result.set(row as i64, col as i64, p);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Raster {
        Raster::from_fn(width, height, |row, col| {
            Pixel::new((col * 40) as u8, (row * 40) as u8, 100)
        })
    }

    #[test]
    fn parse_methods() {
        assert_eq!("nearest".parse::<SamplingMethod>().unwrap(), SamplingMethod::Nearest);
        assert_eq!("bilinear".parse::<SamplingMethod>().unwrap(), SamplingMethod::Bilinear);
        let err = "bicubic".parse::<SamplingMethod>().unwrap_err();
        assert!(matches!(err, PixmapError::InvalidArgument { .. }));
    }

    #[test]
    fn unknown_method_samples_black() {
        let img = Raster::filled(2, 2, Pixel::WHITE);
        assert_eq!(img.get_rel_named(0.0, 0.0, "lanczos"), Pixel::BLACK);
        assert_eq!(img.get_rel_named(0.0, 0.0, "nearest"), Pixel::WHITE);
    }

    #[test]
    fn bilinear_on_grid_returns_stored_pixel() {
        let img = gradient(4, 4);
        // (0.5 * 4, 0.25 * 4) = (2, 1) lands exactly on the grid
        assert_eq!(img.get_rel(0.5, 0.25, SamplingMethod::Bilinear), img.get(2, 1));
    }

    #[test]
    fn bilinear_interpolates_along_x() {
        let img = Raster::from_fn(2, 1, |_, col| {
            if col == 0 {
                Pixel::new(0, 0, 0)
            } else {
                Pixel::new(100, 200, 50)
            }
        });
        // x = 0.25 * 2 = 0.5, halfway between the two columns
        let p = img.get_rel(0.0, 0.25, SamplingMethod::Bilinear);
        assert_eq!(p, Pixel::new(50, 100, 25));
    }

    #[test]
    fn nearest_rounds_coordinates() {
        let img = gradient(4, 4);
        assert_eq!(img.get_rel(0.3, 0.6, SamplingMethod::Nearest), img.get(1, 2));
    }

    #[test]
    fn resize_to_same_size_is_identity() {
        let img = gradient(5, 3);
        assert_eq!(img.resize(5, 3), img);
    }

    #[test]
    fn resize_changes_dimensions() {
        let img = gradient(4, 4);
        let out = img.resize(2, 6);
        assert_eq!(out.dimensions(), (2, 6));
        // Row 0, col 0 samples (0, 0) exactly
        assert_eq!(out.get(0, 0), img.get(0, 0));
    }
}
