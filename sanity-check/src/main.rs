use clap::Parser;
use fhtglow::glare::{generate_glare, FogGlowSettings, MAX_GLARE_SIZE};
use fhtglow::ImageBuffer;
use sanity_check::{blend, load_image, save_png, PngDepth};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

/// Apply fog glow to an image and save the result as PNG.
#[derive(Parser)]
struct Args {
    /// Path to input image
    input: PathBuf,

    /// Path to output PNG file
    output: PathBuf,

    /// log2 of the glow kernel side
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(0..=MAX_GLARE_SIZE as i64))]
    size: u32,

    /// Blend between source (0) and glow (1)
    #[arg(long, default_value_t = 0.5)]
    mix: f32,

    /// Bit depth for the output PNG
    #[arg(long, value_enum, default_value_t = PngDepth::Eight)]
    png_depth: PngDepth,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let src = load_image(&args.input)?;
    let settings = FogGlowSettings::default().with_size(args.size);

    let start = Instant::now();
    let mut glow = ImageBuffer::new(src.width(), src.height(), src.channels());
    generate_glare(&mut glow, &src, &settings)?;
    println!(
        "fog glow {}x{} with {}px kernel in {:.2?}",
        src.width(),
        src.height(),
        1usize << args.size,
        start.elapsed()
    );

    let out = blend(&src, &glow, args.mix)?;
    save_png(&out, &args.output, args.png_depth)?;
    Ok(())
}
