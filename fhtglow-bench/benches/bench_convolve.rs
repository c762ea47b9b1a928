use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fhtglow::glare::{generate_glare, FogGlowSettings};
use fhtglow::{convolve, ImageBuffer};

fn frame(width: usize, height: usize) -> ImageBuffer {
    let data = (0..width * height * 4)
        .map(|i| ((i * 7919) % 1000) as f32 / 1000.0)
        .collect();
    ImageBuffer::from_vec(width, height, 4, data).unwrap()
}

fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");
    group.sample_size(10);
    let image = frame(320, 240);
    let mut out = ImageBuffer::new(320, 240, 4);
    for &k in &[5usize, 31, 64] {
        let mut kernel = ImageBuffer::new(k, k, 4);
        kernel.fill(1.0);
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, _| {
            b.iter(|| convolve(&mut out, &image, &kernel).unwrap());
        });
    }
    group.finish();
}

fn bench_fog_glow(c: &mut Criterion) {
    let mut group = c.benchmark_group("fog_glow");
    group.sample_size(10);
    let image = frame(640, 480);
    let mut out = ImageBuffer::new(640, 480, 4);
    for &size in &[5u32, 7, 9] {
        let settings = FogGlowSettings::default().with_size(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| generate_glare(&mut out, &image, &settings).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convolve, bench_fog_glow);
criterion_main!(benches);
