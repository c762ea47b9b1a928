//! Hartley-domain convolution multiplier.
//!
//! For real signals the Hartley spectrum `X` of a convolution `x ⊛ y` is
//! `½[X(k)(Y(k) + Y(−k)) + X(−k)(Y(k) − Y(−k))]`, so each bin has to be
//! combined with its mirror bin. In two dimensions the mirror of `(j, i)` is
//! `(−j, −i)` modulo the axis lengths.

use crate::fht::FhtError;

/// Multiply two 2D Hartley spectra in place: `d1 ← d1 ⊛ d2`.
///
/// Both buffers are `2^log2_rows` rows of `2^log2_cols` samples. After an
/// inverse [`fht2d`](crate::fht2d::fht2d), `d1` holds the circular convolution
/// of the two spatial signals.
///
/// Bins fall in four classes, all handled here:
/// - the DC/Nyquist corners, which are their own mirror and multiply directly;
/// - the first and Nyquist rows, paired along the row axis;
/// - the first and Nyquist columns, paired along the column axis;
/// - the interior, paired with the diagonally opposite bin.
///
/// # Errors
/// [`FhtError::MismatchedLengths`] when either buffer does not hold
/// `2^(log2_cols + log2_rows)` samples.
pub fn hartley_multiply(
    d1: &mut [f32],
    d2: &[f32],
    log2_cols: u32,
    log2_rows: u32,
) -> Result<(), FhtError> {
    let m = 1usize
        .checked_shl(log2_cols)
        .ok_or(FhtError::MismatchedLengths)?;
    let n = 1usize
        .checked_shl(log2_rows)
        .ok_or(FhtError::MismatchedLengths)?;
    let len = m.checked_mul(n).ok_or(FhtError::MismatchedLengths)?;
    if d1.len() != len || d2.len() != len {
        return Err(FhtError::MismatchedLengths);
    }

    for j in 0..n {
        let jm = (n - j) & (n - 1);
        for i in 0..m {
            let im = (m - i) & (m - 1);
            let p = (j << log2_cols) + i;
            let q = (jm << log2_cols) + im;
            if p == q {
                d1[p] *= d2[p];
            } else if p < q {
                multiply_pair(d1, d2, p, q);
            }
        }
    }
    Ok(())
}

#[inline]
fn multiply_pair(d1: &mut [f32], d2: &[f32], p: usize, q: usize) {
    let a = d1[p] * d2[p] - d1[q] * d2[q];
    let b = d1[q] * d2[p] + d1[p] * d2[q];
    d1[p] = (b + a) * 0.5;
    d1[q] = (b - a) * 0.5;
}
