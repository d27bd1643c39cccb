use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use wireform_core::{varint, Cursor, Sink};

fn sample_values(count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|_| {
            // Mix magnitudes so all encoded lengths are exercised
            let bits = rng.gen_range(0..64);
            rng.gen::<u64>() >> bits
        })
        .collect()
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint_write");
    let values = sample_values(1024);
    group.throughput(Throughput::Elements(values.len() as u64));

    for scheme in ["grouped", "prefixed"] {
        group.bench_with_input(BenchmarkId::from_parameter(scheme), &scheme, |b, _| {
            b.iter(|| {
                let mut buf = Vec::new();
                let mut sink = Sink::new(&mut buf);
                for &value in &values {
                    if scheme == "grouped" {
                        varint::write_grouped(&mut sink, black_box(value)).unwrap();
                    } else {
                        varint::write_prefixed(&mut sink, black_box(value)).unwrap();
                    }
                }
                buf
            });
        });
    }

    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint_read");
    let values = sample_values(1024);

    for scheme in ["grouped", "prefixed"] {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        for &value in &values {
            if scheme == "grouped" {
                varint::write_grouped(&mut sink, value).unwrap();
            } else {
                varint::write_prefixed(&mut sink, value).unwrap();
            }
        }
        drop(sink);

        group.throughput(Throughput::Bytes(buf.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(scheme), &scheme, |b, _| {
            b.iter(|| {
                let mut cursor = Cursor::new(black_box(&buf));
                for _ in 0..values.len() {
                    let value = if scheme == "grouped" {
                        varint::read_grouped(&mut cursor).unwrap()
                    } else {
                        varint::read_prefixed(&mut cursor).unwrap()
                    };
                    black_box(value);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
