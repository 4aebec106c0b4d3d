use crate::uniform::build::{build_rstar, build_srtree, dataset};
use crate::uniform::{DIMENSION as D, K};
use criterion::Criterion;
use ordered_float::OrderedFloat;
use rstar::RTree;
use srtree::SRTree;
use std::collections::BinaryHeap;

pub fn benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("query");
    group.sample_size(10);

    let pts = dataset();
    let srtree = build_srtree(&pts);
    group.bench_function("srtree", |b| {
        b.iter(|| {
            query_srtree(&srtree, &pts);
        });
    });

    let rstar = build_rstar(&pts);
    group.bench_function("rstar", |b| {
        b.iter(|| {
            query_rstar(&rstar, &pts);
        });
    });

    group.bench_function("list", |b| {
        b.iter(|| {
            query_list(&pts);
        });
    });
}

fn query_srtree(srtree: &SRTree<D>, points: &[[f64; D]]) {
    for query in points {
        let neighbors = srtree.k_nearest_neighbors(query, K);
        assert_eq!(neighbors.len(), K);
    }
}

fn query_rstar(rstar: &RTree<[f64; D]>, points: &[[f64; D]]) {
    for query in points {
        let results = rstar.nearest_neighbor_iter(query).take(K).count();
        assert_eq!(results, K);
    }
}

fn query_list(points: &[[f64; D]]) {
    for query in points {
        let mut results = BinaryHeap::from(vec![OrderedFloat(f64::INFINITY); K]);
        for point in points {
            let dist = srtree::euclidean(query, point);
            if dist < results.peek().map_or(f64::INFINITY, |d| d.0) {
                results.push(OrderedFloat(dist));
                results.pop();
            }
        }
        assert_eq!(results.len(), K);
    }
}
