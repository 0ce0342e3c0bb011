#![allow(clippy::unwrap_used, clippy::uninlined_format_args)]

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use persist_codec::utils::compression::{compress, decompress};
use persist_codec::{
    Codec, Compact, Compression, Encrypted, Native, Persistable, PortableSigned, Signed,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Weights {
    layers: Vec<Vec<f32>>,
}

impl Persistable for Weights {
    const CLASS_NAME: &'static str = "Weights";

    fn revision(&self) -> u32 {
        1
    }
}

fn weights(count: usize) -> Weights {
    let mut rng = rand::rng();
    Weights {
        layers: (0..4)
            .map(|_| (0..count / 4).map(|_| rng.random::<f32>()).collect())
            .collect(),
    }
}

fn bench_zlib(c: &mut Criterion) {
    let mut group = c.benchmark_group("zlib");
    let sizes = [64usize, 4096, 65536, 1024 * 1024];

    for &size in &sizes {
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        group.throughput(Throughput::Bytes(size as u64));

        for level in [1u32, 6, 9] {
            group.bench_function(format!("compress_l{}_{}b", level, size), |b| {
                b.iter_batched(
                    || data.clone(),
                    |d| {
                        let _ = compress(&d, level).unwrap();
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.bench_function(format!("decompress_{}b", size), |b| {
            let compressed = compress(&data, 6).unwrap();
            b.iter(|| {
                let out = decompress(&compressed, usize::MAX).unwrap();
                assert_eq!(out.len(), data.len());
            })
        });
    }

    group.finish();
}

fn bench_base_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("base");
    let model = weights(16 * 1024);
    let compact = Compact::new().unwrap();

    group.bench_function("native_encode", |b| b.iter(|| Native.encode(&model).unwrap()));
    group.bench_function("compact_encode", |b| {
        b.iter(|| compact.encode(&model).unwrap())
    });

    let native_bytes = Native.encode(&model).unwrap();
    group.bench_function("native_decode", |b| {
        b.iter(|| {
            let _: Weights = Native.decode(&native_bytes).unwrap();
        })
    });

    group.finish();
}

fn bench_containers(c: &mut Criterion) {
    let mut group = c.benchmark_group("container");
    let model = weights(64 * 1024);
    let base = || Compression::new(Native, 6).unwrap();

    let signed = Signed::with_base("bench-password", base()).unwrap();
    let portable = PortableSigned::with_base("bench-password", base());
    let encrypted = Encrypted::with_base("bench-password", base());

    group.bench_function("signed_encode", |b| b.iter(|| signed.encode(&model).unwrap()));
    group.bench_function("portable_encode", |b| {
        b.iter(|| portable.encode(&model).unwrap())
    });
    group.bench_function("encrypted_encode", |b| {
        b.iter(|| encrypted.encode(&model).unwrap())
    });

    let signed_bytes = signed.encode(&model).unwrap();
    group.bench_function("signed_decode", |b| {
        b.iter(|| {
            let _: Weights = signed.decode(&signed_bytes).unwrap();
        })
    });

    let encrypted_bytes = encrypted.encode(&model).unwrap();
    group.bench_function("encrypted_decode", |b| {
        b.iter(|| {
            let _: Weights = encrypted.decode(&encrypted_bytes).unwrap();
        })
    });

    group.finish();
}

fn bench_key_derivation(c: &mut Criterion) {
    c.bench_function("signed_new_argon2", |b| {
        b.iter(|| Signed::new("bench-password").unwrap())
    });
}

criterion_group!(
    benches,
    bench_zlib,
    bench_base_codecs,
    bench_containers,
    bench_key_derivation
);
criterion_main!(benches);
