//! Two-dimensional Fast Hartley Transform
//!
//! Buffers are flat, row-major, `2^log2_rows` rows of `2^log2_cols` samples.
//! The transform runs the 1D FHT over every row, transposes in place, runs it
//! over the former columns, then applies the quadrant finalization that turns
//! the separable `cas·cas` product into the true 2D Hartley kernel
//! `cas(u + v)`. The result is left transposed.
//!
//! no_std + alloc compatible

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::fht::{fht_pow2, Direction, FhtError};

/// 2D Hartley transform in place.
///
/// - `log2_cols`, `log2_rows`: log2 of the row length and row count.
/// - `nonzero_rows`: rows at or past this index are known to be zero; the
///   forward row pass skips them. Ignored for [`Direction::Inverse`].
///
/// On return the buffer holds `2^log2_cols` rows of `2^log2_rows` samples,
/// i.e. the spectrum is transposed relative to the input layout. Running the
/// inverse with the two logs swapped restores the original layout.
///
/// # Errors
/// [`FhtError::MismatchedLengths`] when `data.len() != 2^(log2_cols + log2_rows)`.
pub fn fht2d(
    data: &mut [f32],
    log2_cols: u32,
    log2_rows: u32,
    nonzero_rows: usize,
    direction: Direction,
) -> Result<(), FhtError> {
    check_len(data, log2_cols, log2_rows)?;
    let cols = 1usize << log2_cols;
    let rows = 1usize << log2_rows;

    let active = if direction.is_inverse() {
        rows
    } else {
        nonzero_rows.min(rows)
    };
    for row in data.chunks_exact_mut(cols).take(active) {
        fht_pow2(row, direction);
    }

    transpose_unchecked(data, log2_cols, log2_rows);

    // Former columns are now contiguous rows of length `rows`.
    for row in data.chunks_exact_mut(rows) {
        fht_pow2(row, direction);
    }

    finalize(data, log2_rows, log2_cols);
    Ok(())
}

/// Recombine the separable transform into the 2D Hartley transform.
///
/// For every quadruple of mirrored bins `(j,i)`, `(−j,i)`, `(j,−i)`, `(−j,−i)`
/// with values `A, B, C, D`, `E = ½((A+D) − (B+C))` is subtracted from `A` and
/// `D` and added to `B` and `C`. Self-mirrored bins get `E = 0`.
fn finalize(data: &mut [f32], log2_cols: u32, log2_rows: u32) {
    let nx = 1usize << log2_cols;
    let ny = 1usize << log2_rows;
    for j in 0..=(ny >> 1) {
        let jm = (ny - j) & (ny - 1);
        let ji = j << log2_cols;
        let jmi = jm << log2_cols;
        for i in 0..=(nx >> 1) {
            let im = (nx - i) & (nx - 1);
            let a = data[ji + i];
            let b = data[jmi + i];
            let c = data[ji + im];
            let d = data[jmi + im];
            let e = 0.5 * ((a + d) - (b + c));
            data[ji + i] = a - e;
            data[jmi + i] = b + e;
            data[ji + im] = c + e;
            data[jmi + im] = d - e;
        }
    }
}

/// Transpose a row-major `2^log2_rows × 2^log2_cols` buffer in place.
///
/// Afterwards the buffer holds `2^log2_cols` rows of `2^log2_rows` samples.
/// Transposing again with the logs swapped restores the input.
///
/// # Errors
/// [`FhtError::MismatchedLengths`] when the buffer length does not match.
pub fn transpose(data: &mut [f32], log2_cols: u32, log2_rows: u32) -> Result<(), FhtError> {
    check_len(data, log2_cols, log2_rows)?;
    transpose_unchecked(data, log2_cols, log2_rows);
    Ok(())
}

/// Out-of-place transpose, the reference for [`transpose`].
///
/// # Errors
/// [`FhtError::MismatchedLengths`] when the buffer length does not match.
pub fn transposed(data: &[f32], log2_cols: u32, log2_rows: u32) -> Result<Vec<f32>, FhtError> {
    check_len(data, log2_cols, log2_rows)?;
    let cols = 1usize << log2_cols;
    let rows = 1usize << log2_rows;
    let mut out = vec![0.0; data.len()];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = data[r * cols + c];
        }
    }
    Ok(out)
}

fn check_len(data: &[f32], log2_cols: u32, log2_rows: u32) -> Result<(), FhtError> {
    let expected = 1usize
        .checked_shl(log2_cols + log2_rows)
        .filter(|_| log2_cols + log2_rows < usize::BITS)
        .ok_or(FhtError::MismatchedLengths)?;
    if data.len() != expected {
        return Err(FhtError::MismatchedLengths);
    }
    Ok(())
}

fn transpose_unchecked(data: &mut [f32], log2_cols: u32, log2_rows: u32) {
    if log2_cols == log2_rows {
        transpose_square(data, log2_cols);
    } else {
        transpose_cycles(data, log2_cols, log2_rows);
    }
}

fn transpose_square(data: &mut [f32], log2_n: u32) {
    let n = 1usize << log2_n;
    for j in 0..n {
        for i in j + 1..n {
            data.swap(i + (j << log2_n), j + (i << log2_n));
        }
    }
}

/// Cycle-following permutation for rectangular buffers.
///
/// Destination slot `k` receives the sample at `source(k)`. Each cycle is
/// rotated once, from its smallest index; `remaining` counts slots not yet
/// placed so the scan stops as soon as every cycle has been handled.
fn transpose_cycles(data: &mut [f32], log2_cols: u32, log2_rows: u32) {
    let row_mask = (1usize << log2_rows) - 1;
    let source = |k: usize| ((k & row_mask) << log2_cols) + (k >> log2_rows);

    let mut remaining = data.len();
    let mut start = 0;
    while remaining > 0 {
        let mut j = source(start);
        while j > start {
            j = source(j);
        }
        // A smaller index on the cycle means it was already rotated.
        if j == start {
            let mut k = start;
            let mut j = source(start);
            while j != start {
                data.swap(j, k);
                k = j;
                j = source(j);
                remaining -= 1;
            }
            remaining -= 1;
        }
        start += 1;
    }
}


#[cfg(all(feature = "internal-tests", test))]
mod proptests {
    use super::*;
    use alloc::format;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_transpose_roundtrip(mx in 0u32..6, my in 0u32..6) {
            let input: Vec<f32> = (0..1usize << (mx + my)).map(|i| i as f32).collect();
            let mut data = input.clone();
            transpose(&mut data, mx, my).unwrap();
            prop_assert_eq!(&data, &transposed(&input, mx, my).unwrap());
            transpose(&mut data, my, mx).unwrap();
            prop_assert_eq!(data, input);
        }
    }
}
