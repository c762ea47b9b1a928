//! Block overlap-add convolution engine.
//!
//! The image is cut into tiles of `(padded − kernel + 1)` pixels per axis,
//! where the padded transform size is the next power of two `≥ 2·kernel − 1`.
//! Each tile is convolved with the kernel through [`fht2d`] and
//! [`hartley_multiply`]; because the padded size holds the full linear
//! convolution of a tile, the circular wraparound never reaches valid data
//! and adding the tiles back together reproduces the exact full convolution.
//!
//! All scratch buffers live for one call only.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::fht::{next_pow2, Direction, FhtError};
use crate::fht2d::fht2d;
use crate::image::ImageBuffer;
use crate::spectral::hartley_multiply;

/// Largest padded transform side accepted, as log2.
pub const MAX_TRANSFORM_LOG2: u32 = 14;

/// Errors reported by the convolution engine and the image helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolveError {
    /// The source image has no pixels or no channels.
    EmptyImage,
    /// The kernel has no pixels or no channels.
    EmptyKernel,
    /// The destination does not have the source image's shape.
    ShapeMismatch,
    /// A raw buffer does not hold `width * height * channels` samples.
    BufferSizeMismatch { expected: usize, actual: usize },
    /// More channels were requested than an input provides.
    MissingChannels { requested: usize, available: usize },
    /// The padded transform would exceed [`MAX_TRANSFORM_LOG2`].
    TransformTooLarge,
    /// A kernel size setting outside the supported range.
    KernelSizeOutOfRange(u32),
    /// A size computation overflowed `usize`.
    Overflow,
    /// The underlying transform rejected its input.
    Transform(FhtError),
}

impl fmt::Display for ConvolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvolveError::EmptyImage => write!(f, "source image is empty"),
            ConvolveError::EmptyKernel => write!(f, "kernel image is empty"),
            ConvolveError::ShapeMismatch => {
                write!(f, "destination shape does not match the source image")
            }
            ConvolveError::BufferSizeMismatch { expected, actual } => write!(
                f,
                "buffer holds {} samples, expected {}",
                actual, expected
            ),
            ConvolveError::MissingChannels {
                requested,
                available,
            } => write!(
                f,
                "{} channels requested but only {} available",
                requested, available
            ),
            ConvolveError::TransformTooLarge => write!(
                f,
                "padded transform side exceeds 2^{}",
                MAX_TRANSFORM_LOG2
            ),
            ConvolveError::KernelSizeOutOfRange(size) => {
                write!(f, "kernel size setting {} is out of range", size)
            }
            ConvolveError::Overflow => write!(f, "size computation overflowed"),
            ConvolveError::Transform(e) => write!(f, "transform failed: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConvolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvolveError::Transform(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FhtError> for ConvolveError {
    fn from(e: FhtError) -> Self {
        ConvolveError::Transform(e)
    }
}

/// Tuning knobs for [`convolve_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvolveOptions {
    /// Number of leading channels to convolve. `None` convolves every channel
    /// of the source image. Remaining channels are copied through unchanged.
    pub channels: Option<usize>,
    /// Lower bound on the padded transform side, as log2. A larger transform
    /// means larger and fewer tiles.
    pub min_transform_log2: u32,
}

impl ConvolveOptions {
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_min_transform_log2(mut self, log2: u32) -> Self {
        self.min_transform_log2 = log2;
        self
    }
}

/// Tiling plan for one convolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGrid {
    /// log2 of the padded transform width.
    pub log2_width: u32,
    /// log2 of the padded transform height.
    pub log2_height: u32,
    pub tile_width: usize,
    pub tile_height: usize,
    pub tiles_x: usize,
    pub tiles_y: usize,
    /// Horizontal shift that centres the kernel, `kernel_width / 2`.
    pub offset_x: usize,
    /// Vertical shift that centres the kernel, `kernel_height / 2`.
    pub offset_y: usize,
}

impl BlockGrid {
    /// Plan the tiles for an image and kernel of the given sizes.
    ///
    /// # Errors
    /// [`ConvolveError::EmptyImage`] / [`ConvolveError::EmptyKernel`] for zero
    /// dimensions and [`ConvolveError::TransformTooLarge`] when the padded
    /// side would exceed [`MAX_TRANSFORM_LOG2`].
    pub fn new(
        image_width: usize,
        image_height: usize,
        kernel_width: usize,
        kernel_height: usize,
        min_transform_log2: u32,
    ) -> Result<Self, ConvolveError> {
        if image_width == 0 || image_height == 0 {
            return Err(ConvolveError::EmptyImage);
        }
        if kernel_width == 0 || kernel_height == 0 {
            return Err(ConvolveError::EmptyKernel);
        }
        let (padded_w, log2_width) = padded_axis(kernel_width, min_transform_log2)?;
        let (padded_h, log2_height) = padded_axis(kernel_height, min_transform_log2)?;
        let tile_width = padded_w + 1 - kernel_width;
        let tile_height = padded_h + 1 - kernel_height;
        Ok(Self {
            log2_width,
            log2_height,
            tile_width,
            tile_height,
            tiles_x: image_width.div_ceil(tile_width),
            tiles_y: image_height.div_ceil(tile_height),
            offset_x: kernel_width >> 1,
            offset_y: kernel_height >> 1,
        })
    }

    #[inline]
    pub fn padded_width(&self) -> usize {
        1 << self.log2_width
    }

    #[inline]
    pub fn padded_height(&self) -> usize {
        1 << self.log2_height
    }

    /// Samples in one padded scratch buffer.
    #[inline]
    pub fn padded_len(&self) -> usize {
        1 << (self.log2_width + self.log2_height)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles_x * self.tiles_y
    }
}

/// Padded transform side for one axis: `max(next_pow2(2k − 1), 2^min_log2)`.
fn padded_axis(kernel: usize, min_log2: u32) -> Result<(usize, u32), ConvolveError> {
    let full = kernel
        .checked_mul(2)
        .ok_or(ConvolveError::Overflow)?
        - 1;
    let (_, log2) = next_pow2(full);
    let log2 = log2.max(min_log2);
    if log2 > MAX_TRANSFORM_LOG2 {
        return Err(ConvolveError::TransformTooLarge);
    }
    Ok((1 << log2, log2))
}

/// Convolve every channel of `image` with `kernel`, writing into `dst`.
///
/// Equivalent to [`convolve_with`] with default options.
pub fn convolve(
    dst: &mut ImageBuffer,
    image: &ImageBuffer,
    kernel: &ImageBuffer,
) -> Result<(), ConvolveError> {
    convolve_with(dst, image, kernel, &ConvolveOptions::default())
}

/// Convolve `image` with `kernel` by block overlap-add, writing into `dst`.
///
/// Each kernel channel is normalized to unit weight first; channels whose
/// weight sums to exactly zero are used as-is. The kernel is centred at
/// `(width / 2, height / 2)` and the result is clipped to the image, i.e. the
/// output is the "same"-size linear convolution with zero borders.
///
/// `dst` must have the shape of `image`. Its convolved channels are fully
/// overwritten; channels past `options.channels` receive a copy of the source.
/// Neither `image` nor `kernel` is modified.
///
/// # Errors
/// See [`ConvolveError`]. Nothing is written to `dst` when validation fails.
pub fn convolve_with(
    dst: &mut ImageBuffer,
    image: &ImageBuffer,
    kernel: &ImageBuffer,
    options: &ConvolveOptions,
) -> Result<(), ConvolveError> {
    if image.is_empty() {
        return Err(ConvolveError::EmptyImage);
    }
    if kernel.is_empty() {
        return Err(ConvolveError::EmptyKernel);
    }
    if !dst.same_shape(image) {
        return Err(ConvolveError::ShapeMismatch);
    }
    let channels = options.channels.unwrap_or(image.channels());
    if channels > image.channels() {
        return Err(ConvolveError::MissingChannels {
            requested: channels,
            available: image.channels(),
        });
    }
    if channels > kernel.channels() {
        return Err(ConvolveError::MissingChannels {
            requested: channels,
            available: kernel.channels(),
        });
    }

    let grid = BlockGrid::new(
        image.width(),
        image.height(),
        kernel.width(),
        kernel.height(),
        options.min_transform_log2,
    )?;
    debug_log!(
        "convolve {}x{} image with {}x{} kernel: transform {}x{}, {}x{} tiles of {}x{}, {} channels",
        image.width(),
        image.height(),
        kernel.width(),
        kernel.height(),
        grid.padded_width(),
        grid.padded_height(),
        grid.tiles_x,
        grid.tiles_y,
        grid.tile_width,
        grid.tile_height,
        channels
    );

    prepare_destination(dst, image, channels);

    let mut kernel_spectrum = vec![0.0f32; grid.padded_len()];
    let mut block = vec![0.0f32; grid.padded_len()];
    for channel in 0..channels {
        load_kernel(&mut kernel_spectrum, kernel, channel, &grid);
        fht2d(
            &mut kernel_spectrum,
            grid.log2_width,
            grid.log2_height,
            kernel.height(),
            Direction::Forward,
        )?;

        for ty in 0..grid.tiles_y {
            for tx in 0..grid.tiles_x {
                trace_log!("channel {} tile ({}, {})", channel, tx, ty);
                let rows = load_tile(&mut block, image, channel, &grid, tx, ty);
                fht2d(
                    &mut block,
                    grid.log2_width,
                    grid.log2_height,
                    rows,
                    Direction::Forward,
                )?;
                // Both spectra are transposed: rows of `padded_height` samples.
                hartley_multiply(
                    &mut block,
                    &kernel_spectrum,
                    grid.log2_height,
                    grid.log2_width,
                )?;
                fht2d(
                    &mut block,
                    grid.log2_height,
                    grid.log2_width,
                    0,
                    Direction::Inverse,
                )?;
                overlap_add(dst, &block, channel, &grid, tx, ty);
            }
        }
    }
    Ok(())
}

/// Zero the channels about to be accumulated and copy the rest from `image`.
fn prepare_destination(dst: &mut ImageBuffer, image: &ImageBuffer, channels: usize) {
    let stride = image.channels();
    for (out, src) in dst
        .as_mut_slice()
        .chunks_exact_mut(stride)
        .zip(image.as_slice().chunks_exact(stride))
    {
        out[..channels].iter_mut().for_each(|s| *s = 0.0);
        out[channels..].copy_from_slice(&src[channels..]);
    }
}

/// Write one normalized kernel channel into the top-left of `buf`.
fn load_kernel(buf: &mut [f32], kernel: &ImageBuffer, channel: usize, grid: &BlockGrid) {
    buf.iter_mut().for_each(|s| *s = 0.0);
    let weight = kernel.channel_sum(channel);
    let scale = if weight != 0.0 { 1.0 / weight } else { 1.0 };
    let stride = grid.padded_width();
    for y in 0..kernel.height() {
        let row = &mut buf[y * stride..y * stride + kernel.width()];
        for (x, out) in row.iter_mut().enumerate() {
            *out = (f64::from(kernel.sample(x, y, channel)) * scale) as f32;
        }
    }
}

/// Copy one channel of tile `(tx, ty)` into a zeroed `buf`.
///
/// Returns the number of rows written; everything below is zero.
fn load_tile(
    buf: &mut [f32],
    image: &ImageBuffer,
    channel: usize,
    grid: &BlockGrid,
    tx: usize,
    ty: usize,
) -> usize {
    buf.iter_mut().for_each(|s| *s = 0.0);
    let x0 = tx * grid.tile_width;
    let y0 = ty * grid.tile_height;
    let cols = grid.tile_width.min(image.width() - x0);
    let rows = grid.tile_height.min(image.height() - y0);
    let stride = grid.padded_width();
    for y in 0..rows {
        let row = &mut buf[y * stride..y * stride + cols];
        for (x, out) in row.iter_mut().enumerate() {
            *out = image.sample(x0 + x, y0 + y, channel);
        }
    }
    rows
}

/// Add a convolved tile into `dst`, shifted back by the kernel centre and
/// clipped to the image.
fn overlap_add(
    dst: &mut ImageBuffer,
    block: &[f32],
    channel: usize,
    grid: &BlockGrid,
    tx: usize,
    ty: usize,
) {
    let width = dst.width();
    let height = dst.height();
    let channels = dst.channels();
    let x0 = tx * grid.tile_width;
    let y0 = ty * grid.tile_height;
    let stride = grid.padded_width();
    let out = dst.as_mut_slice();
    for (y, row) in block.chunks_exact(stride).enumerate() {
        let Some(yy) = (y0 + y).checked_sub(grid.offset_y) else {
            continue;
        };
        if yy >= height {
            break;
        }
        for (x, &value) in row.iter().enumerate() {
            let Some(xx) = (x0 + x).checked_sub(grid.offset_x) else {
                continue;
            };
            if xx >= width {
                break;
            }
            out[(yy * width + xx) * channels + channel] += value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_for_rectangular_kernel() {
        let grid = BlockGrid::new(40, 30, 5, 3, 0).unwrap();
        assert_eq!(grid.padded_width(), 16);
        assert_eq!(grid.padded_height(), 8);
        assert_eq!((grid.tile_width, grid.tile_height), (12, 6));
        assert_eq!((grid.tiles_x, grid.tiles_y), (4, 5));
        assert_eq!((grid.offset_x, grid.offset_y), (2, 1));
        assert_eq!(grid.padded_len(), 128);
        assert_eq!(grid.tile_count(), 20);
    }

    #[test]
    fn grid_for_unit_kernel_uses_single_sample_transform() {
        let grid = BlockGrid::new(3, 2, 1, 1, 0).unwrap();
        assert_eq!((grid.log2_width, grid.log2_height), (0, 0));
        assert_eq!((grid.tile_width, grid.tile_height), (1, 1));
        assert_eq!(grid.tile_count(), 6);
    }

    #[test]
    fn grid_honours_minimum_transform() {
        let grid = BlockGrid::new(40, 30, 5, 5, 6).unwrap();
        assert_eq!(grid.padded_width(), 64);
        assert_eq!(grid.tile_width, 60);
        assert_eq!(grid.tile_count(), 1);
    }

    #[test]
    fn grid_rejects_degenerate_sizes() {
        assert_eq!(BlockGrid::new(0, 4, 3, 3, 0), Err(ConvolveError::EmptyImage));
        assert_eq!(BlockGrid::new(4, 4, 3, 0, 0), Err(ConvolveError::EmptyKernel));
        assert_eq!(
            BlockGrid::new(4, 4, 3, 3, MAX_TRANSFORM_LOG2 + 1),
            Err(ConvolveError::TransformTooLarge)
        );
    }

    #[test]
    fn unconvolved_channels_are_copied() {
        let image = ImageBuffer::from_vec(2, 1, 2, vec![1.0, 5.0, 2.0, 6.0]).unwrap();
        let mut dst = ImageBuffer::new(2, 1, 2);
        dst.fill(-1.0);
        prepare_destination(&mut dst, &image, 1);
        assert_eq!(dst.as_slice(), &[0.0, 5.0, 0.0, 6.0]);
    }

    #[test]
    fn tile_loading_clips_at_border() {
        let mut image = ImageBuffer::new(5, 4, 1);
        for y in 0..4 {
            for x in 0..5 {
                image.write_pixel(x, y, &[(y * 10 + x) as f32]);
            }
        }
        let grid = BlockGrid::new(5, 4, 2, 2, 0).unwrap();
        // padded 4x4, tiles 3x3
        let mut buf = vec![7.0f32; grid.padded_len()];
        let rows = load_tile(&mut buf, &image, 0, &grid, 1, 1);
        assert_eq!(rows, 1);
        assert_eq!(&buf[..4], &[33.0, 34.0, 0.0, 0.0]);
        assert!(buf[4..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn kernel_normalization_skips_zero_sum() {
        let kernel = ImageBuffer::from_vec(2, 1, 2, vec![2.0, 1.0, 2.0, -1.0]).unwrap();
        let grid = BlockGrid::new(4, 4, 2, 1, 0).unwrap();
        let mut buf = vec![0.0f32; grid.padded_len()];
        load_kernel(&mut buf, &kernel, 0, &grid);
        assert_eq!(&buf[..2], &[0.5, 0.5]);
        load_kernel(&mut buf, &kernel, 1, &grid);
        assert_eq!(&buf[..2], &[1.0, -1.0]);
    }

    #[test]
    fn error_display_mentions_counts() {
        use alloc::string::ToString;
        let msg = ConvolveError::MissingChannels {
            requested: 4,
            available: 3,
        }
        .to_string();
        assert_eq!(msg, "4 channels requested but only 3 available");
    }
}
