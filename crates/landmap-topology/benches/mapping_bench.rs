//! Benchmarks for identity placement.
//!
//! Measures:
//! - Hex parsing plus coordinate derivation
//! - Coordinate derivation from an already-parsed key
//! - Validation of claimed positions

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use landmap_topology::{identity_to_coord, validate_coord, IdentityKey};

/// Deterministic pseudo-random identities.
fn identities(count: usize) -> Vec<String> {
    let mut state = 0x9e37_79b9_7f4a_7c15u64;
    (0..count)
        .map(|_| {
            let mut bytes = [0u8; 32];
            for chunk in bytes.chunks_mut(8) {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                chunk.copy_from_slice(&state.to_be_bytes());
            }
            hex::encode(bytes)
        })
        .collect()
}

fn bench_identity_to_coord(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity_to_coord");

    for &count in &[1usize, 100, 10_000] {
        let keys = identities(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(identity_to_coord(black_box(key)).ok());
                }
            })
        });
    }
    group.finish();
}

fn bench_parsed_coord(c: &mut Criterion) {
    let keys: Vec<IdentityKey> = identities(1_000)
        .iter()
        .filter_map(|k| k.parse().ok())
        .collect();

    c.bench_function("parsed_key_coord_1000", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(key.coord());
            }
        })
    });
}

fn bench_validate(c: &mut Criterion) {
    let key = identities(1).remove(0);
    let coord = identity_to_coord(&key).ok().unwrap_or_default();

    c.bench_function("validate_coord", |b| {
        b.iter(|| {
            validate_coord(
                black_box(&key),
                black_box(i64::from(coord.x)),
                black_box(i64::from(coord.y)),
            )
        })
    });
}

criterion_group!(benches, bench_identity_to_coord, bench_parsed_coord, bench_validate);

criterion_main!(benches);
