//! Benchmarks for submodule construction, closure and the bounded searches.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use semilinear::algebra::{Pi, Prod, Vector, Zmod};
use semilinear::closure::{closed_complemented, topological_closure};
use semilinear::config::SearchConfig;
use semilinear::inverse::{inverse_linear, EnumerativeSearch};
use semilinear::map::End;
use semilinear::submodule::Submodule;
use semilinear::topology::Indiscrete;
use semilinear::transport::Transport;

type F5 = Zmod<5>;
type V = Vector<F5, 2>;
type W = Prod<V, Indiscrete<F5>>;

fn f5(v: u64) -> F5 {
    F5::new(v)
}

/// Benchmarks spanning a line and closing it in a non-separated module.
fn bench_span_and_closure(c: &mut Criterion) {
    let seed = Prod(Pi([f5(1), f5(2)]), Indiscrete(f5(0)));
    c.bench_function("span_and_closure_125", |b| {
        b.iter(|| {
            let line = Submodule::<F5, W>::span(black_box(std::slice::from_ref(&seed)));
            black_box(topological_closure(&line).elements().len())
        });
    });
}

/// Benchmarks the projection search for a line in `(ℤ/5)²`.
///
/// The search visits at most `5²` candidates.
fn bench_closed_complemented_line(c: &mut Criterion) {
    let line = Submodule::<F5, V>::span(&[Pi([f5(1), f5(3)])]);
    let config = SearchConfig::default();
    c.bench_function("closed_complemented_line", |b| {
        b.iter(|| {
            let found = closed_complemented(black_box(&line), &config).unwrap();
            assert!(found.is_some());
        });
    });
}

/// Benchmarks tabulated inversion of an invertible map on `(ℤ/5)²`.
fn bench_enumerative_inverse(c: &mut Criterion) {
    let f = End::<F5, V>::of_basis_images(
        Transport::id(),
        vec![Pi([f5(2), f5(1)]), Pi([f5(1), f5(1)])],
    )
    .unwrap();
    let search = EnumerativeSearch::default();
    c.bench_function("enumerative_inverse_25", |b| {
        b.iter(|| black_box(inverse_linear(black_box(&f), &search)));
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_span_and_closure,
              bench_closed_complemented_line,
              bench_enumerative_inverse
);
criterion_main!(benches);
