// src/pixel.rs
//
// Pixel algebra: the vocabulary every blend and filter is written in.
//
// Rounding rules (must stay bit-exact):
// - `+` saturates each channel at 255
// - `* f32` and `/ f32` round half away from zero, then saturate into u8
// - `* Pixel` multiplies channels as fractions of 255 and rounds

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// A 3-channel 8-bit colour value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_array(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Apply `f` to every channel.
    pub fn map(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Combine two pixels channel by channel.
    pub fn zip_with(self, other: Pixel, mut f: impl FnMut(u8, u8) -> u8) -> Self {
        Self::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }

    pub fn abs_diff(self, other: Pixel) -> Self {
        self.zip_with(other, |a, b| a.abs_diff(b))
    }

    pub fn max(self, other: Pixel) -> Self {
        self.zip_with(other, u8::max)
    }

    pub fn min(self, other: Pixel) -> Self {
        self.zip_with(other, u8::min)
    }

    /// Euclidean distance in RGB space.
    pub fn distance(self, other: Pixel) -> f32 {
        let dr = self.r as f32 - other.r as f32;
        let dg = self.g as f32 - other.g as f32;
        let db = self.b as f32 - other.b as f32;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Luma weighting 0.3R + 0.59G + 0.11B.
    pub fn luma(self) -> f32 {
        0.3 * self.r as f32 + 0.59 * self.g as f32 + 0.11 * self.b as f32
    }

    /// HSL hue in degrees [0, 360), or `None` for achromatic colours.
    pub fn hue(self) -> Option<f32> {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        if delta <= f32::EPSILON {
            return None;
        }

        let h = if max == r {
            ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        Some((h * 60.0).rem_euclid(360.0))
    }
}

#[inline]
fn round_channel(v: f32) -> u8 {
    // `as` saturates: negatives go to 0, overflow to 255
    v.round() as u8
}

impl Add for Pixel {
    type Output = Pixel;

    fn add(self, other: Pixel) -> Pixel {
        self.zip_with(other, u8::saturating_add)
    }
}

impl Sub for Pixel {
    type Output = Pixel;

    fn sub(self, other: Pixel) -> Pixel {
        self.zip_with(other, u8::saturating_sub)
    }
}

impl Mul for Pixel {
    type Output = Pixel;

    fn mul(self, other: Pixel) -> Pixel {
        self.zip_with(other, |a, b| round_channel(a as f32 * b as f32 / 255.0))
    }
}

impl Mul<f32> for Pixel {
    type Output = Pixel;

    fn mul(self, operand: f32) -> Pixel {
        self.map(|c| round_channel(c as f32 * operand))
    }
}

impl Div<f32> for Pixel {
    type Output = Pixel;

    fn div(self, operand: f32) -> Pixel {
        self.map(|c| round_channel(c as f32 / operand))
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(c: [u8; 3]) -> Self {
        Self::from_array(c)
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_saturates_per_channel() {
        let p = Pixel::new(200, 10, 255) + Pixel::new(100, 20, 1);
        assert_eq!(p, Pixel::new(255, 30, 255));
    }

    #[test]
    fn add_matches_min_for_all_pairs() {
        for a in (0u16..=255).step_by(17) {
            for b in (0u16..=255).step_by(13) {
                let p = Pixel::new(a as u8, b as u8, 0) + Pixel::new(b as u8, a as u8, 0);
                let expected = (a + b).min(255) as u8;
                assert_eq!(p.r, expected);
                assert_eq!(p.g, expected);
            }
        }
    }

    #[test]
    fn scalar_multiply_rounds_half_away_from_zero() {
        assert_eq!(Pixel::new(1, 3, 5) * 0.5, Pixel::new(1, 2, 3));
        assert_eq!(Pixel::new(10, 0, 255) * 1.0, Pixel::new(10, 0, 255));
    }

    #[test]
    fn scalar_multiply_saturates_on_overflow() {
        assert_eq!(Pixel::new(200, 100, 0) * 2.0, Pixel::new(255, 200, 0));
        assert_eq!(Pixel::new(200, 100, 0) * -1.0, Pixel::BLACK);
    }

    #[test]
    fn scalar_divide_rounds() {
        assert_eq!(Pixel::new(5, 7, 255) / 2.0, Pixel::new(3, 4, 128));
    }

    #[test]
    fn pixel_product_is_normalised() {
        assert_eq!(Pixel::WHITE * Pixel::new(12, 34, 56), Pixel::new(12, 34, 56));
        assert_eq!(Pixel::BLACK * Pixel::new(12, 34, 56), Pixel::BLACK);
        assert_eq!(Pixel::new(128, 128, 128) * Pixel::new(128, 128, 128), Pixel::new(64, 64, 64));
    }

    #[test]
    fn hue_of_primaries() {
        assert_eq!(Pixel::new(255, 0, 0).hue(), Some(0.0));
        assert_eq!(Pixel::new(0, 255, 0).hue(), Some(120.0));
        assert_eq!(Pixel::new(0, 0, 255).hue(), Some(240.0));
        assert_eq!(Pixel::new(90, 90, 90).hue(), None);
    }

    #[test]
    fn display_formats_channels() {
        assert_eq!(Pixel::new(1, 2, 3).to_string(), "(1, 2, 3)");
    }
}
