use crate::uniform::build::{build_rstar, build_srtree, dataset};
use crate::uniform::{DIMENSION as D, RADIUS};
use criterion::Criterion;
use rstar::{RTree, AABB};
use srtree::{Mbb, SRTree};

pub fn benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("query_box");

    let pts = dataset();
    let srtree = build_srtree(&pts);
    group.bench_function("srtree", |b| {
        b.iter(|| {
            query_box_srtree(&srtree, &pts);
        });
    });

    let rstar = build_rstar(&pts);
    group.bench_function("rstar", |b| {
        b.iter(|| {
            query_box_rstar(&rstar, &pts);
        });
    });
}

fn around(query: &[f64; D]) -> ([f64; D], [f64; D]) {
    let mut min = *query;
    let mut max = *query;
    for i in 0..D {
        min[i] -= RADIUS;
        max[i] += RADIUS;
    }
    (min, max)
}

fn query_box_srtree(srtree: &SRTree<D>, points: &[[f64; D]]) {
    for query in points {
        let (min, max) = around(query);
        let mbb = Mbb::new(min, max).expect("Invalid box");
        assert!(srtree.range_query(&mbb).contains(query));
    }
}

fn query_box_rstar(rstar: &RTree<[f64; D]>, points: &[[f64; D]]) {
    for query in points {
        let (min, max) = around(query);
        let envelope = AABB::from_corners(min, max);
        assert!(rstar.locate_in_envelope(&envelope).any(|point| point == query));
    }
}
