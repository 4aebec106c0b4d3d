use crate::{distance::Point, error::Error};

/// Axis-aligned minimum bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mbb<const D: usize> {
    pub min: Point<D>,
    pub max: Point<D>,
}

impl<const D: usize> Mbb<D> {
    /// Builds a box from its corners.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvertedCorners`] if `min[i] > max[i]` on some axis or
    /// a corner coordinate is not finite.
    pub fn new(min: Point<D>, max: Point<D>) -> Result<Mbb<D>, Error> {
        for axis in 0..D {
            let (lo, hi) = (min[axis], max[axis]);
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(Error::InvertedCorners {
                    axis,
                    min: lo,
                    max: hi,
                });
            }
        }
        Ok(Mbb { min, max })
    }

    /// Degenerate box around a single point.
    #[must_use]
    pub fn point(point: Point<D>) -> Mbb<D> {
        Mbb {
            min: point,
            max: point,
        }
    }

    pub fn expand_to_include_point(&mut self, point: &Point<D>) {
        for (axis, x) in point.iter().enumerate() {
            self.min[axis] = self.min[axis].min(*x);
            self.max[axis] = self.max[axis].max(*x);
        }
    }

    pub fn expand_to_include(&mut self, other: &Mbb<D>) {
        for axis in 0..D {
            self.min[axis] = self.min[axis].min(other.min[axis]);
            self.max[axis] = self.max[axis].max(other.max[axis]);
        }
    }

    /// Distance from `point` to the farthest corner of the box.
    #[must_use]
    pub fn max_distance(&self, point: &Point<D>) -> f64 {
        let mut sum = 0.0;
        for (axis, x) in point.iter().enumerate() {
            let near = (x - self.min[axis]).abs();
            let far = (x - self.max[axis]).abs();
            sum += near.max(far).powi(2);
        }
        sum.sqrt()
    }

    #[must_use]
    pub fn intersects(&self, other: &Mbb<D>) -> bool {
        (0..D).all(|axis| self.max[axis] >= other.min[axis] && self.min[axis] <= other.max[axis])
    }

    #[must_use]
    pub fn contains_point(&self, point: &Point<D>) -> bool {
        self.contains_point_within(point, 0.0)
    }

    /// Containment test against the box grown by `tolerance` on every side.
    #[must_use]
    pub fn contains_point_within(&self, point: &Point<D>, tolerance: f64) -> bool {
        point.iter().enumerate().all(|(axis, x)| {
            *x >= self.min[axis] - tolerance && *x <= self.max[axis] + tolerance
        })
    }

    #[must_use]
    pub fn contains_box(&self, other: &Mbb<D>) -> bool {
        (0..D).all(|axis| self.min[axis] <= other.min[axis] && other.max[axis] <= self.max[axis])
    }
}
