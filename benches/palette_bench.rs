use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagepalette::palette::MedianCut;

// A 1280x200 strip: mostly background, a band of accent, some text-like noise
fn header_like_rgba() -> Vec<u8> {
    let (w, h) = (1280usize, 200usize);
    let mut buf = Vec::with_capacity(w * h * 4);
    for y in 0..h {
        for x in 0..w {
            let px = if y > 160 {
                [30, 90, 200, 255]
            } else if (x / 7 + y / 11) % 13 == 0 {
                [20, 20, 20, 255]
            } else {
                [245, 245, 240, 255]
            };
            buf.extend_from_slice(&px);
        }
    }
    buf
}

fn bench_quantize(c: &mut Criterion) {
    let data = header_like_rgba();

    c.bench_function("median_cut_step4", |b| {
        let q = MedianCut::default();
        b.iter(|| q.quantize_rgba(black_box(&data)))
    });

    c.bench_function("median_cut_every_pixel", |b| {
        let q = MedianCut {
            palette_size: 8,
            step: 1,
        };
        b.iter(|| q.quantize_rgba(black_box(&data)))
    });
}

criterion_group!(benches, bench_quantize);
criterion_main!(benches);
