use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("max_entries must be at least 2, got {max_entries}")]
    InvalidFanout { max_entries: usize },

    #[error("bounding box corners are inverted or not finite on axis {axis}: min {min}, max {max}")]
    InvertedCorners { axis: usize, min: f64, max: f64 },

    #[error("sphere radius must be non-negative, got {radius}")]
    InvalidRadius { radius: f64 },

    #[error("bounding box of node {node} does not contain all of its entries")]
    BoxViolation { node: usize },

    #[error("bounding sphere of node {node} misses an entry by {excess}")]
    SphereViolation { node: usize, excess: f64 },

    #[error("node {node} holds {entries} entries, outside the allowed fanout")]
    FanoutViolation { node: usize, entries: usize },

    #[error("node {node} has an inconsistent height or parent link")]
    HeightViolation { node: usize },
}
