use crate::{
    distance::{euclidean, Point},
    error::Error,
};
use conv::ValueFrom;

/// Bounding sphere: every bounded entry lies within `radius` of `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere<const D: usize> {
    pub center: Point<D>,
    pub radius: f64,
}

impl<const D: usize> Sphere<D> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidRadius`] for a negative or NaN radius.
    pub fn new(center: Point<D>, radius: f64) -> Result<Sphere<D>, Error> {
        if radius.is_nan() || radius < 0.0 {
            return Err(Error::InvalidRadius { radius });
        }
        Ok(Sphere { center, radius })
    }

    #[must_use]
    pub fn point(point: Point<D>) -> Sphere<D> {
        Sphere {
            center: point,
            radius: 0.0,
        }
    }

    /// Centroid sphere: centered at the mean of `points`, with the radius
    /// reaching the farthest of them. Returns `None` for an empty slice.
    #[must_use]
    pub fn enclosing(points: &[Point<D>]) -> Option<Sphere<D>> {
        if points.is_empty() {
            return None;
        }
        let weight = f64::value_from(points.len()).unwrap_or(f64::INFINITY);
        let mut center = [0.0; D];
        for point in points {
            for (i, x) in point.iter().enumerate() {
                center[i] += x;
            }
        }
        for x in &mut center {
            *x /= weight;
        }

        let radius = points
            .iter()
            .map(|point| euclidean(&center, point))
            .fold(0.0, f64::max);
        Some(Sphere { center, radius })
    }

    pub fn expand_to_include_point(&mut self, point: &Point<D>) {
        self.radius = self.radius.max(euclidean(&self.center, point));
    }

    /// Grows the sphere to cover `other` as well.
    ///
    /// The center only moves when `other` already encloses `self`; otherwise
    /// the radius grows to reach the far side of `other`. The result covers
    /// both spheres but is generally not the minimal enclosing sphere.
    pub fn expand_to_include(&mut self, other: &Sphere<D>) {
        let distance = euclidean(&self.center, &other.center);
        if distance + other.radius <= self.radius {
            return;
        }
        if distance + self.radius <= other.radius {
            *self = *other;
            return;
        }
        self.radius = distance + other.radius;
    }

    /// Lower bound on the distance from `point` to anything inside the sphere.
    #[must_use]
    pub fn min_distance(&self, point: &Point<D>) -> f64 {
        (euclidean(&self.center, point) - self.radius).max(0.)
    }

    #[must_use]
    pub fn contains_point(&self, point: &Point<D>) -> bool {
        euclidean(&self.center, point) <= self.radius
    }
}
