//! # fhtglow - Hartley-domain convolution for large-kernel image effects
//!
//! Convolving an image with a kernel of comparable size directly costs
//! `O(W·H·kw·kh)`. This crate performs the convolution in the frequency domain
//! with a real, in-place Fast Hartley Transform (FHT) instead, and tiles the
//! image with overlap-add so scratch memory stays bounded by the kernel size.
//!
//! ## Building blocks
//!
//! - [`fht`]: 1D radix-2 FHT, forward and inverse.
//! - [`fht2d`]: 2D transform built from the 1D transform, an in-place transpose
//!   and the finalization pass that turns the separable result into the true
//!   2D Hartley transform.
//! - [`spectral`]: Hartley-domain equivalent of pointwise complex
//!   multiplication.
//! - [`convolve`]: block overlap-add engine over multi-channel images.
//! - [`glare`]: fog glow kernel generator and entry point.
//! - [`hartley`]: direct `O(N²)` transforms used as reference oracles.
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` impls for the error types
//! - `verbose-logging`: emit planning and per-tile records through `log`
//! - `internal-tests`: enable the in-crate property test suites
//!
//! ## Example
//!
//! ```
//! use fhtglow::convolve::convolve;
//! use fhtglow::image::ImageBuffer;
//!
//! let mut image = ImageBuffer::new(16, 16, 3);
//! image.write_pixel(8, 8, &[1.0, 1.0, 1.0]);
//! let mut kernel = ImageBuffer::new(3, 3, 3);
//! kernel.write_pixel(1, 1, &[1.0, 1.0, 1.0]);
//!
//! let mut out = ImageBuffer::new(16, 16, 3);
//! convolve(&mut out, &image, &kernel).unwrap();
//! assert!((out.sample(8, 8, 0) - 1.0).abs() < 1e-4);
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

/// Debug-level record, compiled only with the `verbose-logging` feature.
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "verbose-logging")]
        {
            log::debug!($($arg)*);
        }
    }};
}

/// Trace-level record, compiled only with the `verbose-logging` feature.
macro_rules! trace_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "verbose-logging")]
        {
            log::trace!($($arg)*);
        }
    }};
}

/// Fast Hartley Transform (FHT)
///
/// In-place radix-2 transform over power-of-two real buffers.
pub mod fht;

/// Two-dimensional FHT
///
/// Row/column transform with in-place transpose and quadrant finalization.
pub mod fht2d;

/// Hartley-domain convolution multiplier
pub mod spectral;

/// Discrete Hartley Transform (DHT)
///
/// Direct reference implementations, used to validate the fast paths.
pub mod hartley;

/// Interleaved multi-channel float image buffer
pub mod image;

/// Block overlap-add convolution engine
pub mod convolve;

/// Fog glow kernel generation
pub mod glare;

pub use convolve::{convolve, convolve_with, BlockGrid, ConvolveError, ConvolveOptions};
pub use fht::{fht, next_pow2, Direction, FhtError};
pub use glare::{generate_glare, FogGlowSettings};
pub use image::ImageBuffer;
