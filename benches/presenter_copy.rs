use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fractal_stream::copy_rgb_to_rgba;

fn bench_copy_rgb_to_rgba(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_rgb_to_rgba");

    for (width, height) in [(480usize, 416usize), (1920, 1080)] {
        let pixels = width * height;
        let src: Vec<u8> = (0..pixels * 3).map(|i| (i % 251) as u8).collect();
        let mut dst = vec![0u8; pixels * 4];

        group.throughput(Throughput::Elements(pixels as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &src,
            |b, src| b.iter(|| copy_rgb_to_rgba(black_box(src), black_box(&mut dst))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_copy_rgb_to_rgba);
criterion_main!(benches);
