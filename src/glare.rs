//! Fog glow: convolution with a windowed exponential radial falloff.

use core::f32::consts::PI;

use libm::{cosf, expf, sqrtf};

use crate::convolve::{convolve_with, ConvolveError, ConvolveOptions};
use crate::image::ImageBuffer;

/// Largest accepted [`FogGlowSettings::size`]; the kernel side is `2^size`.
pub const MAX_GLARE_SIZE: u32 = 12;

/// Color channels convolved by default. A fourth (alpha) channel is passed
/// through.
pub const COLOR_CHANNELS: usize = 3;

/// Fog glow parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FogGlowSettings {
    /// log2 of the kernel side length.
    pub size: u32,
    /// Leading channels to convolve, capped by the image's channel count.
    pub channels: usize,
}

impl Default for FogGlowSettings {
    fn default() -> Self {
        Self {
            size: 8,
            channels: COLOR_CHANNELS,
        }
    }
}

impl FogGlowSettings {
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }
}

/// Build the fog glow kernel: a square image of side `2^size`.
///
/// Pixel `(x, y)` maps to `u = 2x/side − 1`, `v = 2y/side − 1` and holds
/// `exp(−9·r^(1/8))·(½ + ½cos πu)(½ + ½cos πv)` with
/// `r = (u² + v²)·side/4`, identical on every channel.
///
/// # Errors
/// [`ConvolveError::KernelSizeOutOfRange`] when `size > MAX_GLARE_SIZE`,
/// [`ConvolveError::EmptyKernel`] when `channels == 0`.
pub fn fog_glow_kernel(size: u32, channels: usize) -> Result<ImageBuffer, ConvolveError> {
    if size > MAX_GLARE_SIZE {
        return Err(ConvolveError::KernelSizeOutOfRange(size));
    }
    if channels == 0 {
        return Err(ConvolveError::EmptyKernel);
    }
    let side = 1usize << size;
    let scale = 0.25 * side as f32;
    let mut kernel = ImageBuffer::new(side, side, channels);
    let mut pixel = [0.0f32; 4];
    for y in 0..side {
        let v = 2.0 * (y as f32 / side as f32) - 1.0;
        let wv = 0.5 + 0.5 * cosf(v * PI);
        for x in 0..side {
            let u = 2.0 * (x as f32 / side as f32) - 1.0;
            let r = (u * u + v * v) * scale;
            let falloff = expf(-9.0 * sqrtf(sqrtf(sqrtf(r))));
            let window = (0.5 + 0.5 * cosf(u * PI)) * wv;
            let value = falloff * window;
            if channels <= pixel.len() {
                pixel[..channels].iter_mut().for_each(|s| *s = value);
                kernel.write_pixel(x, y, &pixel[..channels]);
            } else {
                let start = (y * side + x) * channels;
                kernel.as_mut_slice()[start..start + channels]
                    .iter_mut()
                    .for_each(|s| *s = value);
            }
        }
    }
    Ok(kernel)
}

/// Apply fog glow to `image`, writing the glow into `dst`.
///
/// The first `min(settings.channels, image.channels())` channels are
/// convolved with [`fog_glow_kernel`]; any further channels are copied from
/// `image`.
///
/// # Errors
/// Propagates kernel and convolution errors, see [`ConvolveError`].
pub fn generate_glare(
    dst: &mut ImageBuffer,
    image: &ImageBuffer,
    settings: &FogGlowSettings,
) -> Result<(), ConvolveError> {
    let channels = settings.channels.min(image.channels());
    let kernel = fog_glow_kernel(settings.size, channels.max(1))?;
    debug_log!(
        "fog glow: {}x{} kernel over {} channels",
        kernel.width(),
        kernel.height(),
        channels
    );
    let options = ConvolveOptions::default().with_channels(channels);
    convolve_with(dst, image, &kernel, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, tol: f32) -> bool {
        let d = a - b;
        d <= tol && d >= -tol
    }

    #[test]
    fn kernel_peaks_at_centre() {
        let k = fog_glow_kernel(4, 3).unwrap();
        assert_eq!((k.width(), k.height(), k.channels()), (16, 16, 3));
        assert_eq!(k.pixel(8, 8), &[1.0, 1.0, 1.0]);
        let peak = k.as_slice().iter().cloned().fold(f32::MIN, f32::max);
        assert_eq!(peak, 1.0);
    }

    #[test]
    fn kernel_vanishes_on_leading_edge() {
        let k = fog_glow_kernel(4, 1).unwrap();
        for i in 0..16 {
            assert!(close(k.sample(i, 0, 0), 0.0, 1e-6));
            assert!(close(k.sample(0, i, 0), 0.0, 1e-6));
        }
    }

    #[test]
    fn kernel_is_symmetric() {
        let k = fog_glow_kernel(5, 1).unwrap();
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(k.sample(x, y, 0), k.sample(y, x, 0));
            }
        }
        for d in 1..16 {
            assert!(close(k.sample(16 + d, 16, 0), k.sample(16 - d, 16, 0), 1e-6));
        }
    }

    #[test]
    fn kernel_is_monochrome() {
        let k = fog_glow_kernel(3, 4).unwrap();
        for px in k.as_slice().chunks_exact(4) {
            assert!(px.iter().all(|&s| s == px[0]));
        }
    }

    #[test]
    fn wide_kernels_fill_every_channel() {
        let k = fog_glow_kernel(2, 6).unwrap();
        assert_eq!(k.pixel(2, 2), &[1.0; 6]);
    }

    #[test]
    fn rejects_oversized_kernel() {
        assert_eq!(
            fog_glow_kernel(MAX_GLARE_SIZE + 1, 3),
            Err(ConvolveError::KernelSizeOutOfRange(MAX_GLARE_SIZE + 1))
        );
        assert_eq!(fog_glow_kernel(2, 0), Err(ConvolveError::EmptyKernel));
    }

    #[test]
    fn settings_builder() {
        let s = FogGlowSettings::default().with_size(5).with_channels(4);
        assert_eq!(s, FogGlowSettings { size: 5, channels: 4 });
        assert_eq!(FogGlowSettings::default().size, 8);
    }
}
