use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fhtglow::fht::{fht, Direction};
use fhtglow::fht2d::{fht2d, transpose};
use rustfft::{num_complex::Complex32, FftPlanner};

fn bench_fht_vs_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fht_vs_rustfft");
    for &log2 in &[6u32, 10, 14] {
        let n = 1usize << log2;
        let input: Vec<f32> = (0..n).map(|i| (i as f32 * 0.37).sin()).collect();

        let mut data = input.clone();
        group.bench_with_input(BenchmarkId::new("fht", n), &n, |b, _| {
            b.iter(|| {
                data.copy_from_slice(&input);
                fht(&mut data, Direction::Forward).unwrap();
            });
        });

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);
        let complex: Vec<Complex32> = input.iter().map(|&x| Complex32::new(x, 0.0)).collect();
        let mut buf = complex.clone();
        group.bench_with_input(BenchmarkId::new("rustfft", n), &n, |b, _| {
            b.iter(|| {
                buf.copy_from_slice(&complex);
                fft.process(&mut buf);
            });
        });
    }
    group.finish();
}

fn bench_fht2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("fht2d");
    for &(mx, my) in &[(8u32, 8u32), (10, 9), (11, 11)] {
        let len = 1usize << (mx + my);
        let input: Vec<f32> = (0..len).map(|i| ((i * 31) % 97) as f32 / 97.0).collect();
        let mut data = input.clone();
        let label = format!("{}x{}", 1u32 << mx, 1u32 << my);
        group.bench_with_input(BenchmarkId::new("forward", &label), &len, |b, _| {
            b.iter(|| {
                data.copy_from_slice(&input);
                fht2d(&mut data, mx, my, 1 << my, Direction::Forward).unwrap();
            });
        });
        group.bench_with_input(BenchmarkId::new("transpose", &label), &len, |b, _| {
            b.iter(|| {
                data.copy_from_slice(&input);
                transpose(&mut data, mx, my).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fht_vs_fft, bench_fht2d);
criterion_main!(benches);
