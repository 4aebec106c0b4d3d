//! SR-tree: a balanced spatial index for `D`-dimensional points.
//!
//! Each node is bounded by both an axis-aligned box and a sphere. Range
//! queries prune with whichever volume matches the query shape, and nearest
//! neighbor search orders subtrees by their sphere lower bound.
//!
//! ```
//! use srtree::{Mbb, SRTree};
//!
//! let mut tree = SRTree::new(4).expect("Invalid fanout");
//! for point in [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [5.0, 5.0]] {
//!     tree.insert(point);
//! }
//!
//! assert!(tree.search(&[5.0, 5.0]));
//! let all = Mbb::new([0.0, 0.0], [10.0, 10.0]).unwrap();
//! assert_eq!(tree.range_query(&all).len(), 5);
//! assert_eq!(tree.k_nearest_neighbors(&[0.0, 0.0], 2), vec![[0.0, 0.0], [5.0, 5.0]]);
//! ```

mod distance;
mod error;
mod mbb;
mod node;
mod sphere;
#[allow(clippy::module_name_repetitions)]
mod srtree;

pub use distance::{euclidean, Point};
pub use error::Error;
pub use mbb::Mbb;
pub use sphere::Sphere;
pub use srtree::{SRTree, TreeStats, EPSILON};
