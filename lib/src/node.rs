use std::fmt;

use crate::{distance::Point, mbb::Mbb, sphere::Sphere};

/// What a node stores: points (leaf) or child slots (internal).
#[derive(Clone, Debug)]
pub enum Entries<const D: usize> {
    Points(Vec<Point<D>>),
    Children(Vec<usize>),
}

#[derive(Clone, Debug)]
pub struct Node<const D: usize> {
    pub height: usize,
    pub parent: Option<usize>,
    pub bbox: Mbb<D>,
    pub sphere: Sphere<D>,
    pub entries: Entries<D>,
}

impl<const D: usize> Node<D> {
    #[must_use]
    pub fn leaf(point: Point<D>) -> Node<D> {
        Node {
            height: 1,
            parent: None,
            bbox: Mbb::point(point),
            sphere: Sphere::point(point),
            entries: Entries::Points(vec![point]),
        }
    }

    /// Internal node over `children`; bounding volumes are filled in by the
    /// tree once the children are known.
    #[must_use]
    pub fn internal(height: usize, children: Vec<usize>) -> Node<D> {
        Node {
            height,
            parent: None,
            bbox: Mbb::point([0.0; D]),
            sphere: Sphere::point([0.0; D]),
            entries: Entries::Children(children),
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.entries, Entries::Points(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.entries {
            Entries::Points(points) => points.len(),
            Entries::Children(children) => children.len(),
        }
    }

    /// Recomputes both bounding volumes of a leaf from its points.
    pub fn reshape_leaf(&mut self) {
        if let Entries::Points(points) = &self.entries {
            if let Some((first, rest)) = points.split_first() {
                let mut bbox = Mbb::point(*first);
                for point in rest {
                    bbox.expand_to_include_point(point);
                }
                self.bbox = bbox;
            }
            if let Some(sphere) = Sphere::enclosing(points) {
                self.sphere = sphere;
            }
        }
    }
}

// One CSV row: height,is_leaf,entries,min..,max..,center..,radius
impl<const D: usize> fmt::Display for Node<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.height, self.is_leaf(), self.len())?;
        for x in self.bbox.min.iter().chain(self.bbox.max.iter()) {
            write!(f, ",{x}")?;
        }
        for x in &self.sphere.center {
            write!(f, ",{x}")?;
        }
        writeln!(f, ",{}", self.sphere.radius)
    }
}
