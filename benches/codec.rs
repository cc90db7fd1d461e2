use cellsim_tables::sequences::{compact, reconstruct, PAD_VALUE};
use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 4000 sequences of 50..1500 symbols in a 1600-wide buffer
fn padded_buffer() -> DMatrix<i8> {
    let mut rng = StdRng::seed_from_u64(7);
    let (rows, cols) = (4000, 1600);
    let mut m = DMatrix::from_element(rows, cols, PAD_VALUE);
    for i in 0..rows {
        let len = rng.gen_range(50..1500);
        for j in 0..len {
            m[(i, j)] = rng.gen_range(0..21);
        }
    }
    m
}

fn bench_codec(c: &mut Criterion) {
    let padded = padded_buffer();

    c.bench_function("compact_4000x1600", |b| b.iter(|| compact(&padded, PAD_VALUE)));

    let compacted = compact(&padded, PAD_VALUE);
    c.bench_function("reconstruct_4000x1600", |b| {
        b.iter(|| reconstruct(&compacted.rows, compacted.shape, PAD_VALUE))
    });

    c.bench_function("serialize_compacted_4000x1600", |b| {
        b.iter(|| serde_json::to_string(&compacted))
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
