// src/raster.rs
//
// The Raster buffer: a row-major, channel-interleaved RGB byte grid.
//
// Every transform lives in one of the raster/ submodules and returns a
// fresh Raster. Only set/set_index/set_data/fill/replace mutate in place.
//
// Bounds policy: every read through `get` outside the grid yields
// `Pixel::BLACK`, every write through `set` outside the grid is dropped.
// Neighbourhood operations (convolution, channel shift, halftone, bilinear
// sampling) rely on this instead of clamping.

mod blend;
mod color;
mod convolve;
mod geometry;
mod sampling;
mod stylize;

pub use convolve::{ConvolutionBuffer, Kernel, MAX_GAUSSIAN_SIZE};
pub use sampling::SamplingMethod;
pub use stylize::{Offset, HALFTONE_ENLARGE, HALFTONE_SCALE};

use crate::error::PixmapError;
use crate::pixel::Pixel;

/// Channels per pixel. Fixed: alpha and other depths are not modelled.
pub const CHANNELS: usize = 3;

/// An owned RGB image. Cloning performs a deep copy of the buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Allocate a black raster of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; buffer_len(width, height)],
        }
    }

    /// Allocate a raster filled with `color`.
    pub fn filled(width: u32, height: u32, color: Pixel) -> Self {
        let mut raster = Self::new(width, height);
        raster.fill(color);
        raster
    }

    /// Wrap an existing RGB buffer. `data.len()` must equal `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixmapError> {
        check_buffer_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a raster by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Pixel) -> Self {
        let mut data = Vec::with_capacity(buffer_len(width, height));
        for row in 0..height {
            for col in 0..width {
                data.extend_from_slice(&f(row, col).to_array());
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw RGB bytes, `width * height * 3` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Replace the whole buffer and its dimensions.
    pub fn set_data(&mut self, width: u32, height: u32, data: Vec<u8>) -> Result<(), PixmapError> {
        check_buffer_len(width, height, data.len())?;
        self.width = width;
        self.height = height;
        self.data = data;
        Ok(())
    }

    #[inline]
    fn offset(&self, row: i64, col: i64) -> Option<usize> {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return None;
        }
        Some((row as usize * self.width as usize + col as usize) * CHANNELS)
    }

    /// Read the pixel at (row, col); black when out of bounds.
    #[inline]
    pub fn get(&self, row: i64, col: i64) -> Pixel {
        match self.offset(row, col) {
            Some(i) => Pixel::new(self.data[i], self.data[i + 1], self.data[i + 2]),
            None => Pixel::BLACK,
        }
    }

    /// Write the pixel at (row, col); ignored when out of bounds.
    #[inline]
    pub fn set(&mut self, row: i64, col: i64, color: Pixel) {
        if let Some(i) = self.offset(row, col) {
            self.data[i..i + CHANNELS].copy_from_slice(&color.to_array());
        }
    }

    /// Read by linear index (`row = i / width`, `col = i % width`).
    pub fn get_index(&self, i: usize) -> Pixel {
        match self.linear_offset(i) {
            Some(o) => Pixel::new(self.data[o], self.data[o + 1], self.data[o + 2]),
            None => Pixel::BLACK,
        }
    }

    /// Write by linear index; ignored when out of bounds.
    pub fn set_index(&mut self, i: usize, color: Pixel) {
        if let Some(o) = self.linear_offset(i) {
            self.data[o..o + CHANNELS].copy_from_slice(&color.to_array());
        }
    }

    #[inline]
    fn linear_offset(&self, i: usize) -> Option<usize> {
        (i < self.pixel_count()).then_some(i * CHANNELS)
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|c| Pixel::new(c[0], c[1], c[2]))
    }

    /// Produce a same-sized raster by mapping every pixel.
    pub(crate) fn map_pixels(&self, mut f: impl FnMut(Pixel) -> Pixel) -> Raster {
        let mut data = Vec::with_capacity(self.data.len());
        for p in self.pixels() {
            data.extend_from_slice(&f(p).to_array());
        }
        Raster {
            width: self.width,
            height: self.height,
            data,
        }
    }

    pub(crate) fn ensure_same_dimensions(&self, other: &Raster) -> Result<(), PixmapError> {
        if self.dimensions() != other.dimensions() {
            return Err(PixmapError::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }
        Ok(())
    }
}

fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

fn check_buffer_len(width: u32, height: u32, len: usize) -> Result<(), PixmapError> {
    let expected = buffer_len(width, height);
    if len != expected {
        return Err(PixmapError::invalid_argument(
            "data",
            format!("{len} bytes"),
            format!("expected {expected} bytes for {width}x{height} RGB"),
        ));
    }
    Ok(())
}
