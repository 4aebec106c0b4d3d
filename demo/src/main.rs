use rand::{rngs::StdRng, Rng, SeedableRng};
use srtree::{Mbb, SRTree, Sphere};
use std::{error::Error, fs::File, io::Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

const NUM_POINTS: usize = 5000;
const NUM_CLUSTERS: usize = 8;
const FANOUT: usize = 15;
const OUTPUT: &str = "demo/data/tree.csv";

// Usage: demo [num_points] [fanout] [output.csv]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let num_points = args.next().map_or(Ok(NUM_POINTS), |arg| arg.parse())?;
    let fanout = args.next().map_or(Ok(FANOUT), |arg| arg.parse())?;
    let output = args.next().unwrap_or_else(|| OUTPUT.to_string());

    // Clustered dataset: points scattered around a few random centers
    let mut rng = StdRng::seed_from_u64(0);
    let centers = (0..NUM_CLUSTERS)
        .map(|_| [rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)])
        .collect::<Vec<[f64; 2]>>();
    let mut tree = SRTree::new(fanout)?;
    for i in 0..num_points {
        let center = centers[i % NUM_CLUSTERS];
        let spread = rng.gen_range(1.0..15.0);
        tree.insert([
            center[0] + rng.gen_range(-spread..spread),
            center[1] + rng.gen_range(-spread..spread),
        ]);
    }

    let stats = tree.stats();
    info!(
        points = stats.points,
        nodes = stats.nodes,
        leaves = stats.leaves,
        height = stats.height,
        "tree built"
    );
    tree.validate(1e-9)?;

    let query = centers[0];
    let window = Mbb::new(
        [query[0] - 10.0, query[1] - 10.0],
        [query[0] + 10.0, query[1] + 10.0],
    )?;
    let disk = Sphere::new(query, 10.0)?;
    info!(
        found = tree.search(&query),
        in_box = tree.range_query(&window).len(),
        in_sphere = tree.range_query_sphere(&disk).len(),
        "queries around the first cluster center"
    );
    for (rank, (point, distance)) in tree.nearest_neighbors(&query, 5).iter().enumerate() {
        info!(rank, x = point[0], y = point[1], distance, "neighbor");
    }

    if let Some(parent) = std::path::Path::new(&output).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(&output)?;
    for row in tree.nodes_to_string_rows() {
        file.write_all(row.as_bytes())?;
    }
    info!(path = %output, "node bounding volumes written");
    Ok(())
}
