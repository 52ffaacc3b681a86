//! Backend Comparison Benchmark
//!
//! Compares ECB/CBC/CTR throughput through the public dispatcher. The
//! backend actually exercised (`aesni` or `bitsliced`) depends on what the
//! benchmarking machine's CPU supports; the group name records which one ran.
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use dispatch_aes::{AesContext, AesVariant};
use rand::prelude::*;
use std::hint::black_box;

fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill(&mut bytes[..]);
    bytes
}

fn bench_backend(c: &mut Criterion) {
    let key = random_bytes(16);
    let mut ctx = AesContext::new();
    ctx.init(AesVariant::Aes128, &key);
    let backend = ctx.active_backend();

    let mut group = c.benchmark_group(format!("AES-128 ({backend})"));
    let iv = [0u8; 16];

    // Small (16B): single block, dispatch overhead dominates.
    // Medium (4KiB): cache-hot throughput.
    // Large (1MiB): bulk throughput.
    let sizes = [16, 4 * 1024, 1024 * 1024];

    for size in sizes {
        let plaintext = random_bytes(size);
        let mut ciphertext = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function(format!("ecb_encrypt - {size} bytes"), |b| {
            b.iter(|| ctx.ecb_encrypt(black_box(&plaintext), &mut ciphertext));
        });

        group.bench_function(format!("cbc_encrypt - {size} bytes"), |b| {
            b.iter(|| ctx.cbc_encrypt(iv, black_box(&plaintext), &mut ciphertext));
        });

        group.bench_function(format!("ctr_xcrypt - {size} bytes"), |b| {
            b.iter(|| ctx.ctr_xcrypt(iv, black_box(&plaintext), &mut ciphertext));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_backend);
criterion_main!(benches);
