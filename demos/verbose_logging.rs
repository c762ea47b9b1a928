//! Demonstrates enabling verbose logging for fhtglow.
use fhtglow::convolve::convolve;
use fhtglow::image::ImageBuffer;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let mut image = ImageBuffer::new(32, 32, 3);
    image.write_pixel(16, 16, &[1.0, 1.0, 1.0]);
    let mut kernel = ImageBuffer::new(5, 5, 3);
    kernel.fill(1.0);
    let mut out = ImageBuffer::new(32, 32, 3);

    convolve(&mut out, &image, &kernel).unwrap();
}
