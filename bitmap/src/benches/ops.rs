use bitspan_bitmap::Bitmap;
use criterion::{criterion_group, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

/// Builds a bitmap with roughly `range / sparsity` set bits.
fn build(seed: u64, range: i32, sparsity: i32) -> Bitmap {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bitmap = Bitmap::new();
    for _ in 0..range / sparsity {
        bitmap.insert(rng.gen_range(0..range));
    }
    bitmap
}

fn bench_operators(c: &mut Criterion) {
    for (range, sparsity) in [(1 << 14, 2), (1 << 18, 2), (1 << 18, 64)] {
        let a = build(0, range, sparsity);
        let b = build(1, range, sparsity);
        for (name, op) in [
            ("union", (|a, b| a | b) as fn(&Bitmap, &Bitmap) -> Bitmap),
            ("intersection", |a, b| a & b),
            ("difference", |a, b| a - b),
        ] {
            c.bench_function(
                &format!("{}/fn={name} range={range} sparsity={sparsity}", module_path!()),
                |bench| {
                    bench.iter(|| black_box(op(&a, &b)));
                },
            );
        }
    }
}

fn bench_compare(c: &mut Criterion) {
    let a = build(0, 1 << 18, 2);
    let mut b = a.clone();
    b.insert(1 << 19);
    c.bench_function(&format!("{}/fn=compare size={}", module_path!(), 1 << 18), |bench| {
        bench.iter(|| black_box(a.cmp(&b)));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_operators, bench_compare,
}
