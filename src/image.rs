//! Interleaved multi-channel `f32` image buffer.
//!
//! Samples are stored row-major with the channel index varying fastest, so
//! pixel `(x, y)` occupies `data[(y * width + x) * channels..][..channels]`.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::convolve::ConvolveError;

/// Owned image with explicit dimensions and channel count.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl ImageBuffer {
    /// Zero-initialised image.
    ///
    /// # Panics
    /// If `width * height * channels` overflows `usize`.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        let len = sample_count(width, height, channels).expect("image dimensions overflow usize");
        Self {
            width,
            height,
            channels,
            data: vec![0.0; len],
        }
    }

    /// Wrap an existing interleaved buffer.
    ///
    /// # Errors
    /// [`ConvolveError::BufferSizeMismatch`] when `data.len()` is not
    /// `width * height * channels`, [`ConvolveError::Overflow`] when that
    /// product does not fit in `usize`.
    pub fn from_vec(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> Result<Self, ConvolveError> {
        let expected = sample_count(width, height, channels).ok_or(ConvolveError::Overflow)?;
        if data.len() != expected {
            return Err(ConvolveError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `true` when the image holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }

    /// All channels of pixel `(x, y)`.
    ///
    /// # Panics
    /// If the coordinates are outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let start = self.offset(x, y);
        &self.data[start..start + self.channels]
    }

    /// One sample of pixel `(x, y)`.
    ///
    /// # Panics
    /// If the coordinates or channel are out of range.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, channel: usize) -> f32 {
        self.pixel(x, y)[channel]
    }

    /// Overwrite pixel `(x, y)` with `values`.
    ///
    /// Extra values are ignored; missing ones leave the remaining channels
    /// untouched.
    ///
    /// # Panics
    /// If the coordinates are outside the image.
    pub fn write_pixel(&mut self, x: usize, y: usize, values: &[f32]) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let start = self.offset(x, y);
        let n = values.len().min(self.channels);
        self.data[start..start + n].copy_from_slice(&values[..n]);
    }

    /// Set every sample of every pixel to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.iter_mut().for_each(|s| *s = value);
    }

    /// Sum of one channel over the whole image, accumulated in `f64`.
    ///
    /// # Panics
    /// If `channel >= self.channels()`.
    pub fn channel_sum(&self, channel: usize) -> f64 {
        assert!(channel < self.channels, "channel {channel} out of range");
        self.data
            .iter()
            .skip(channel)
            .step_by(self.channels)
            .map(|&s| f64::from(s))
            .sum()
    }

    /// `true` when both images have the same width, height and channel count.
    pub fn same_shape(&self, other: &ImageBuffer) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }
}

fn sample_count(width: usize, height: usize, channels: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(channels)
}
