//! Applies fog glow to a synthetic frame with a few bright highlights.
use fhtglow::convolve::BlockGrid;
use fhtglow::glare::{generate_glare, FogGlowSettings};
use fhtglow::image::ImageBuffer;

fn main() {
    let (width, height) = (256, 192);
    let mut frame = ImageBuffer::new(width, height, 4);
    for y in 0..height {
        for x in 0..width {
            frame.write_pixel(x, y, &[0.02, 0.02, 0.03, 1.0]);
        }
    }
    frame.write_pixel(64, 64, &[40.0, 30.0, 10.0, 1.0]);
    frame.write_pixel(180, 120, &[5.0, 20.0, 40.0, 1.0]);

    let settings = FogGlowSettings::default().with_size(6);
    let side = 1usize << settings.size;
    let grid = BlockGrid::new(width, height, side, side, 0).unwrap();
    println!(
        "kernel {side}x{side}, transform {}x{}, {} tiles",
        grid.padded_width(),
        grid.padded_height(),
        grid.tile_count()
    );

    let mut glow = ImageBuffer::new(width, height, 4);
    generate_glare(&mut glow, &frame, &settings).unwrap();

    for ch in 0..3 {
        println!(
            "channel {ch}: in {:.3} out {:.3}",
            frame.channel_sum(ch),
            glow.channel_sum(ch)
        );
    }
    println!("glow at (70, 64): {:?}", glow.pixel(70, 64));
}
