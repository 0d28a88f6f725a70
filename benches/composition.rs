//! Benchmarks for map composition and transport normalisation.
//!
//! These measure the cost of building composites (closure nesting and
//! certificate derivation), evaluating them, and reducing semilinear
//! transport words through the registry.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use semilinear::algebra::{Gaussian, Pi, Vector};
use semilinear::map::{ContinuousLinearMap, End};
use semilinear::transport::{Transport, TransportRegistry};

type V3 = Vector<i64, 3>;
type G = Gaussian<i64>;

fn rotation() -> End<i64, V3> {
    End::of_basis_images(
        Transport::id(),
        vec![Pi([0, 1, 0]), Pi([0, 0, 1]), Pi([1, 0, 0])],
    )
    .unwrap()
}

/// Benchmarks building a 64-fold composite and evaluating it once.
fn bench_compose_chain_64(c: &mut Criterion) {
    let f = rotation();
    c.bench_function("compose_chain_64", |b| {
        b.iter(|| {
            let g = black_box(&f).pow(64);
            black_box(g.apply(&Pi([1, 2, 3])))
        });
    });
}

/// Benchmarks extensional equality on a free module of rank 3.
///
/// This is the cost of every `==` on maps: evaluation on the generators and
/// their probe multiples.
fn bench_ext_eq_rank_3(c: &mut Criterion) {
    let f = rotation().pow(3);
    let id = End::<i64, V3>::id();
    c.bench_function("ext_eq_rank_3", |b| {
        b.iter(|| assert!(black_box(&f).ext_eq(black_box(&id))));
    });
}

/// Benchmarks composing conjugate-linear maps with registry normalisation.
fn bench_comp_in_conjugate_chain(c: &mut Criterion) {
    let mut registry = TransportRegistry::new();
    registry.declare_involution("conj");
    let conj = Transport::named("conj", |z: &G| z.conj());
    let f = ContinuousLinearMap::from_fn(conj, |z: &G| z.conj()).unwrap();

    c.bench_function("comp_in_conjugate_chain_32", |b| {
        b.iter(|| {
            let mut acc = f.clone();
            for _ in 0..31 {
                acc = f.comp_in(black_box(&acc), &registry);
            }
            black_box(acc.transport().is_identity())
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_compose_chain_64,
              bench_ext_eq_rank_3,
              bench_comp_in_conjugate_chain
);
criterion_main!(benches);
