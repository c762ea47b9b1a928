//! Fast Hartley Transform (FHT)
//!
//! Radix-2, decimation-in-time transform over real `f32` buffers whose length
//! is a power of two. The transform is its own inverse up to a `1/N` factor,
//! which [`Direction::Inverse`] applies.
//!
//! no_std + alloc compatible

use core::f64::consts::PI;
use core::fmt;

use libm::{cos, sqrt};

/// Errors that can occur while transforming a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FhtError {
    /// The buffer has no samples.
    EmptyInput,
    /// The buffer length is not a power of two.
    NonPowerOfTwo,
    /// The buffer length does not match the dimensions it was described with.
    MismatchedLengths,
}

impl fmt::Display for FhtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FhtError::EmptyInput => write!(f, "input buffer is empty"),
            FhtError::NonPowerOfTwo => write!(f, "buffer length must be a power of two"),
            FhtError::MismatchedLengths => {
                write!(f, "buffer length does not match the transform dimensions")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FhtError {}

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    /// Same butterflies as forward, followed by a `1/N` scale.
    Inverse,
}

impl Direction {
    #[inline]
    pub fn is_inverse(self) -> bool {
        matches!(self, Direction::Inverse)
    }
}

/// Smallest power of two `>= x`, together with its base-2 logarithm.
///
/// `0` and `1` both map to `(1, 0)`.
pub fn next_pow2(x: usize) -> (usize, u32) {
    if x <= 1 {
        return (1, 0);
    }
    let pow = x.next_power_of_two();
    (pow, pow.trailing_zeros())
}

/// In-order bit-reversed increment.
///
/// Given `r`, the bit reversal of some index `i`, returns the bit reversal of
/// `i + 1`. `half` is half the transform length.
#[inline]
pub(crate) fn revbin_update(mut r: usize, mut half: usize) -> usize {
    loop {
        r ^= half;
        if r & half != 0 {
            return r;
        }
        half >>= 1;
    }
}

/// Compute the Hartley transform of `data` in place.
///
/// `H[k] = Σ x[n]·(cos(2πnk/N) + sin(2πnk/N))`. With [`Direction::Inverse`]
/// the result is additionally scaled by `1/N`, so applying forward then
/// inverse returns the input.
///
/// # Errors
/// [`FhtError::EmptyInput`] for an empty slice and
/// [`FhtError::NonPowerOfTwo`] when the length is not a power of two.
pub fn fht(data: &mut [f32], direction: Direction) -> Result<(), FhtError> {
    if data.is_empty() {
        return Err(FhtError::EmptyInput);
    }
    if !data.len().is_power_of_two() {
        return Err(FhtError::NonPowerOfTwo);
    }
    fht_pow2(data, direction);
    Ok(())
}

/// Unchecked transform; `data.len()` must be a non-zero power of two.
pub(crate) fn fht_pow2(data: &mut [f32], direction: Direction) {
    let len = data.len();
    if len < 2 {
        return;
    }

    let half = len >> 1;
    let mut j = 0;
    for i in 1..len - 1 {
        j = revbin_update(j, half);
        if j > i {
            data.swap(i, j);
        }
    }

    let mut n = 1;
    let mut angle = PI;
    while n < len {
        let istep = n << 1;

        let mut k = 0;
        while k < len {
            let t1 = data[n + k];
            data[n + k] = data[k] - t1;
            data[k] += t1;
            k += istep;
        }

        let n2 = n >> 1;
        if n > 2 {
            // Rotation recurrence instead of a cos/sin call per butterfly.
            let dc = cos(angle);
            let ds = sqrt(1.0 - dc * dc);
            let (mut fc, mut fs) = (dc, ds);
            let mut bd = n - 2;
            for bl in 1..n2 {
                let mut k = bl;
                while k < len {
                    let xn = f64::from(data[n + k]);
                    let xnbd = f64::from(data[n + bd + k]);
                    let t1 = (fc * xn + fs * xnbd) as f32;
                    let t2 = (fs * xn - fc * xnbd) as f32;
                    data[n + k] = data[k] - t1;
                    data[n + bd + k] = data[bd + k] - t2;
                    data[k] += t1;
                    data[bd + k] += t2;
                    k += istep;
                }
                let tt = fc * dc - fs * ds;
                fs = fs * dc + fc * ds;
                fc = tt;
                bd -= 2;
            }
        }

        if n > 1 {
            let mut k = n2;
            while k < len {
                let t1 = data[n + k];
                data[n + k] = data[k] - t1;
                data[k] += t1;
                k += istep;
            }
        }

        n = istep;
        angle *= 0.5;
    }

    if direction.is_inverse() {
        let scale = 1.0 / len as f32;
        for x in data.iter_mut() {
            *x *= scale;
        }
    }
}


#[cfg(all(feature = "internal-tests", test))]
mod proptests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_fht_roundtrip(log2 in 0u32..10, ref signal in proptest::collection::vec(-1000.0f32..1000.0, 512)) {
            let n = 1usize << log2;
            let x: Vec<f32> = signal.iter().take(n).cloned().collect();
            let mut y = x.clone();
            fht(&mut y, Direction::Forward).unwrap();
            fht(&mut y, Direction::Inverse).unwrap();
            for (a, b) in x.iter().zip(y.iter()) {
                let d = a - b;
                prop_assert!(d < 1e-1 && d > -1e-1, "{} vs {}", a, b);
            }
        }
    }
}
