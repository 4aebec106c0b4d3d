use crate::uniform::{DIMENSION as D, FANOUT, NUM_POINTS};
use criterion::Criterion;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rstar::RTree;
use srtree::SRTree;

pub fn benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("build");

    let points = dataset();
    group.bench_function("srtree", |b| {
        b.iter(|| build_srtree(&points));
    });

    group.bench_function("rstar", |b| {
        b.iter(|| build_rstar(&points));
    });
}

pub fn dataset() -> Vec<[f64; D]> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..NUM_POINTS)
        .map(|_| {
            let mut point = [0.0; D];
            for x in &mut point {
                *x = rng.gen_range(-100.0..100.0);
            }
            point
        })
        .collect()
}

pub fn build_srtree(points: &[[f64; D]]) -> SRTree<D> {
    let mut tree = SRTree::new(FANOUT).expect("Invalid fanout");
    for point in points {
        tree.insert(*point);
    }
    tree
}

pub fn build_rstar(points: &[[f64; D]]) -> RTree<[f64; D]> {
    let mut rstar = RTree::new();
    for point in points {
        rstar.insert(*point);
    }
    rstar
}
