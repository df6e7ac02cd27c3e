//! Encoding and numeric codec benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use node_buffer::Buffer;
use node_buffer::encoding::{self, Encoding};

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let data = sample(64 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for encoding in [Encoding::Hex, Encoding::Base64, Encoding::Latin1, Encoding::Utf16Le] {
        group.bench_with_input(BenchmarkId::from_parameter(encoding.as_str()), &data, |b, data| {
            b.iter(|| std::hint::black_box(encoding::encode(data, encoding)));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let data = sample(64 * 1024);

    for encoding in [Encoding::Hex, Encoding::Base64, Encoding::Base64Url, Encoding::Latin1] {
        let text = encoding::encode(&data, encoding);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(encoding.as_str()), &text, |b, text| {
            b.iter(|| std::hint::black_box(encoding::decode(text, encoding)));
        });
    }

    group.finish();
}

fn bench_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("numeric");
    let buf = Buffer::alloc(4096).unwrap();
    group.throughput(Throughput::Elements(512));

    group.bench_function("write_read_f64_le", |b| {
        b.iter(|| {
            let mut offset = 0;
            while offset < buf.len() {
                offset = buf.write_f64_le(offset as f64, offset).unwrap();
            }
            let mut sum = 0.0;
            for i in (0..buf.len()).step_by(8) {
                sum += buf.read_f64_le(i).unwrap();
            }
            std::hint::black_box(sum)
        });
    });

    group.bench_function("write_big_u64_be", |b| {
        b.iter(|| {
            for i in (0..buf.len()).step_by(8) {
                buf.write_big_u64_be(i as u64, i).unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_numeric);
criterion_main!(benches);
