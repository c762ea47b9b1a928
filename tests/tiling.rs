//! Tile-boundary consistency: the overlap-add result must not depend on how
//! the image is cut into blocks.

use fhtglow::convolve::{convolve_with, BlockGrid, ConvolveOptions};
use fhtglow::image::ImageBuffer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPSILON: f32 = 1e-4;

fn random_image(width: usize, height: usize, channels: usize, seed: u64) -> ImageBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height * channels)
        .map(|_| rng.gen_range(0.0..1.0))
        .collect();
    ImageBuffer::from_vec(width, height, channels, data).unwrap()
}

fn run(image: &ImageBuffer, kernel: &ImageBuffer, min_log2: u32) -> ImageBuffer {
    let mut out = ImageBuffer::new(image.width(), image.height(), image.channels());
    let options = ConvolveOptions::default().with_min_transform_log2(min_log2);
    convolve_with(&mut out, image, kernel, &options).unwrap();
    out
}

#[test]
fn single_tile_matches_many_tiles() {
    let image = random_image(40, 30, 3, 1);
    let kernel = random_image(5, 5, 3, 2);

    let tiled = BlockGrid::new(40, 30, 5, 5, 0).unwrap();
    let whole = BlockGrid::new(40, 30, 5, 5, 6).unwrap();
    assert!(tiled.tile_count() > 1);
    assert_eq!(whole.tile_count(), 1);

    let a = run(&image, &kernel, 0);
    let b = run(&image, &kernel, 6);
    for (i, (x, y)) in a.as_slice().iter().zip(b.as_slice()).enumerate() {
        assert!((x - y).abs() <= EPSILON, "sample {i}: {x} vs {y}");
    }
}

#[test]
fn intermediate_tile_sizes_agree() {
    let image = random_image(37, 29, 1, 3);
    let kernel = random_image(6, 4, 1, 4);
    let reference = run(&image, &kernel, 0);
    for min_log2 in 4..=6 {
        let other = run(&image, &kernel, min_log2);
        for (x, y) in reference.as_slice().iter().zip(other.as_slice()) {
            assert!((x - y).abs() <= EPSILON, "min_log2={min_log2}: {x} vs {y}");
        }
    }
}

#[test]
fn partial_border_tiles_leave_no_seams() {
    // Tile width 12 does not divide 31, so the last column of tiles is partial.
    let mut image = ImageBuffer::new(31, 31, 1);
    image.fill(1.0);
    let mut kernel = ImageBuffer::new(5, 5, 1);
    kernel.fill(1.0);
    let out = run(&image, &kernel, 0);
    for y in 2..29 {
        for x in 2..29 {
            assert!((out.sample(x, y, 0) - 1.0).abs() <= EPSILON, "({x}, {y})");
        }
    }
    // Corners see a quarter-ish of the kernel: 3x3 of 25 taps.
    assert!((out.sample(0, 0, 0) - 9.0 / 25.0).abs() <= EPSILON);
}
