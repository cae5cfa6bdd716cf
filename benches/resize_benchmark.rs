use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgb, RgbImage};

use resizebench::bench::CountingSink;
use resizebench::processing::{fit_dimensions, JpegCodec, NativeJpeg, TurboJpeg};
use resizebench::ResizerRegistry;

fn source_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    });
    let mut out = Vec::new();
    NativeJpeg
        .encode(&mut out, &DynamicImage::ImageRgb8(img))
        .expect("encode fixture");
    out
}

fn benchmark_resizers(c: &mut Criterion) {
    let registry = ResizerRegistry::builtin().expect("builtin registry");
    let data = source_jpeg(1024, 768);

    let mut group = c.benchmark_group("resize_1024x768_to_256w");
    group.sample_size(20);

    for resizer in registry.list_all() {
        group.bench_with_input(BenchmarkId::from_parameter(resizer.name()), &data, |b, data| {
            b.iter(|| {
                let mut sink = CountingSink::default();
                resizer
                    .strategy()
                    .resize(&TurboJpeg, &mut Cursor::new(data), &mut sink, 256, 0)
                    .expect("resize");
                black_box(sink.written())
            })
        });
    }
    group.finish();
}

fn benchmark_codecs(c: &mut Criterion) {
    let data = source_jpeg(1024, 768);
    let mut group = c.benchmark_group("decode_1024x768");

    for codec in [&NativeJpeg as &dyn JpegCodec, &TurboJpeg] {
        group.bench_function(codec.name(), |b| {
            b.iter(|| codec.decode(&mut Cursor::new(black_box(&data))).expect("decode"))
        });
    }
    group.finish();
}

fn benchmark_fit(c: &mut Criterion) {
    c.bench_function("fit_dimensions", |b| {
        b.iter(|| fit_dimensions(black_box(4928), black_box(3279), black_box(800), black_box(600)))
    });
}

criterion_group!(benches, benchmark_resizers, benchmark_codecs, benchmark_fit);
criterion_main!(benches);
