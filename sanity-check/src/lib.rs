use clap::ValueEnum;
use fhtglow::ImageBuffer as GlowImage;
use image::{
    codecs::png::{CompressionType, FilterType, PngEncoder},
    ColorType, EncodableLayout, ImageBuffer, ImageEncoder, Rgb,
};
use std::error::Error;
use std::fs::File;
use std::path::Path;

/// Channels carried through the glow pipeline (RGBA).
pub const CHANNELS: usize = 4;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PngDepth {
    Eight,
    Sixteen,
}

/// Decode an image file into a 4-channel float buffer with samples in `[0, 1]`.
pub fn load_image(path: &Path) -> Result<GlowImage, Box<dyn Error>> {
    let rgba = image::open(path)?.to_rgba32f();
    let (w, h) = (rgba.width() as usize, rgba.height() as usize);
    Ok(GlowImage::from_vec(w, h, CHANNELS, rgba.into_raw())?)
}

/// Linear blend `src·(1 − amount) + glow·amount` over every sample.
///
/// `amount` is clamped to `[0, 1]`: 0 keeps the source, 1 keeps the glow.
pub fn blend(src: &GlowImage, glow: &GlowImage, amount: f32) -> Result<GlowImage, Box<dyn Error>> {
    if !src.same_shape(glow) {
        return Err("source and glow images differ in shape".into());
    }
    let t = amount.clamp(0.0, 1.0);
    let data = src
        .as_slice()
        .iter()
        .zip(glow.as_slice())
        .map(|(&s, &g)| s * (1.0 - t) + g * t)
        .collect();
    Ok(GlowImage::from_vec(src.width(), src.height(), src.channels(), data)?)
}

/// Quantize the first three channels to 16-bit RGB, clamping to `[0, 1]`.
pub fn to_rgb16(img: &GlowImage) -> ImageBuffer<Rgb<u16>, Vec<u16>> {
    let quantize = |v: f32| (v.clamp(0.0, 1.0) * 65535.0).round() as u16;
    ImageBuffer::from_fn(img.width() as u32, img.height() as u32, |x, y| {
        let px = img.pixel(x as usize, y as usize);
        let get = |c: usize| px.get(c).or_else(|| px.first()).copied().unwrap_or(0.0);
        Rgb([quantize(get(0)), quantize(get(1)), quantize(get(2))])
    })
}

pub fn save_png(img: &GlowImage, path: &Path, depth: PngDepth) -> Result<(), Box<dyn Error>> {
    let img = to_rgb16(img);
    let file = File::create(path)?;
    let encoder = PngEncoder::new_with_quality(file, CompressionType::Best, FilterType::Adaptive);
    let (w, h) = (img.width(), img.height());
    match depth {
        PngDepth::Eight => {
            let img8: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(w, h, |x, y| {
                let p = img.get_pixel(x, y);
                Rgb([
                    (p.0[0] >> 8) as u8,
                    (p.0[1] >> 8) as u8,
                    (p.0[2] >> 8) as u8,
                ])
            });
            encoder.write_image(img8.as_raw(), w, h, ColorType::Rgb8)?;
        }
        PngDepth::Sixteen => {
            encoder.write_image(img.as_raw().as_bytes(), w, h, ColorType::Rgb16)?;
        }
    }
    Ok(())
}
