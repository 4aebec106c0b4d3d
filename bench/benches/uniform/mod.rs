mod build;
mod query;
mod query_box;
mod query_radius;

// Benchmark parameters:
pub const DIMENSION: usize = 2;
pub const NUM_POINTS: usize = 10000;
pub const FANOUT: usize = 15;
pub const K: usize = 10; // Number of neighbors to query
pub const RADIUS: f64 = 5.0; // Radius for range queries
pub const RADIUS_SQUARED: f64 = RADIUS * RADIUS;

pub use build::benchmark as build;
pub use query::benchmark as query;
pub use query_box::benchmark as query_box;
pub use query_radius::benchmark as query_radius;
