use crate::uniform::build::{build_rstar, build_srtree, dataset};
use crate::uniform::{DIMENSION as D, RADIUS, RADIUS_SQUARED};
use criterion::Criterion;
use rstar::RTree;
use srtree::{SRTree, Sphere};

pub fn benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("query_radius");

    let pts = dataset();
    let srtree = build_srtree(&pts);
    group.bench_function("srtree", |b| {
        b.iter(|| {
            query_range_srtree(&srtree, &pts);
        });
    });

    let rstar = build_rstar(&pts);
    group.bench_function("rstar", |b| {
        b.iter(|| {
            query_range_rstar(&rstar, &pts);
        });
    });

    group.bench_function("list", |b| {
        b.iter(|| {
            query_range_list(&pts);
        });
    });
}

fn query_range_srtree(srtree: &SRTree<D>, points: &[[f64; D]]) {
    for query in points {
        let sphere = Sphere::new(*query, RADIUS).expect("Invalid radius");
        let result = srtree.range_query_sphere(&sphere);
        assert!(result.contains(query));
    }
}

fn query_range_rstar(rstar: &RTree<[f64; D]>, points: &[[f64; D]]) {
    for query in points {
        let result = rstar
            .locate_within_distance(*query, RADIUS_SQUARED)
            .collect::<Vec<_>>();
        assert!(result.contains(&query));
    }
}

fn query_range_list(points: &[[f64; D]]) {
    for query in points {
        let results = points
            .iter()
            .filter(|point| srtree::euclidean(query, *point) <= RADIUS)
            .count();
        assert!(results > 0);
    }
}
