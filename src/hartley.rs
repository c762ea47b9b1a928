//! Discrete Hartley Transform (DHT) module
//! Direct O(N²) evaluation for real `f32` input, accumulated in `f64`.
//! no_std + alloc compatible

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;
use libm::{cos, sin};

#[inline]
fn cas(angle: f64) -> f64 {
    cos(angle) + sin(angle)
}

/// Discrete Hartley Transform (DHT)
///
/// Unnormalized: applying it twice multiplies the input by its length.
pub fn dht(input: &[f32]) -> Vec<f32> {
    let n = input.len();
    let mut output = vec![0.0; n];
    let factor = 2.0 * PI / n as f64;
    for (k, out) in output.iter_mut().enumerate() {
        let mut sum = 0.0f64;
        for (i, &x) in input.iter().enumerate() {
            // Reduce the product modulo n to keep the angle small.
            let angle = factor * ((i * k) % n) as f64;
            sum += f64::from(x) * cas(angle);
        }
        *out = sum as f32;
    }
    output
}

/// Two-dimensional DHT of a row-major `rows × cols` buffer.
///
/// `H[v][u] = Σ x[r][c]·cas(2π(rv/rows + cu/cols))`, laid out row-major like
/// the input.
pub fn dht2d(input: &[f32], cols: usize, rows: usize) -> Vec<f32> {
    assert_eq!(input.len(), cols * rows, "dht2d: buffer is not rows × cols");
    let mut output = vec![0.0; input.len()];
    for v in 0..rows {
        for u in 0..cols {
            let mut sum = 0.0f64;
            for r in 0..rows {
                let row_phase = ((r * v) % rows) as f64 / rows as f64;
                for c in 0..cols {
                    let col_phase = ((c * u) % cols) as f64 / cols as f64;
                    let angle = 2.0 * PI * (row_phase + col_phase);
                    sum += f64::from(input[r * cols + c]) * cas(angle);
                }
            }
            output[v * cols + u] = sum as f32;
        }
    }
    output
}
