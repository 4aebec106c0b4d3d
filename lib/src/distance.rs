/// A point in `D`-dimensional space.
pub type Point<const D: usize> = [f64; D];

#[must_use]
pub fn euclidean<const D: usize>(a: &Point<D>, b: &Point<D>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
