use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
    mem,
};

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::{
    distance::{euclidean, Point},
    error::Error,
    mbb::Mbb,
    node::{Entries, Node},
    sphere::Sphere,
};

/// Tolerance used by [`SRTree::search`] when matching stored points.
///
/// Membership is a best-effort check: a stored point closer than `EPSILON`
/// to the query counts as a match, so distinct points that close together are
/// indistinguishable.
pub const EPSILON: f64 = 1e-6;

const DEFAULT_MAX_ENTRIES: usize = 15;

/// Result of inserting into a subtree.
enum Insertion {
    NoSplit,
    /// The subtree root overflowed; the payload is the slot of its new sibling.
    Split(usize),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub height: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub points: usize,
}

/// SR-tree over `D`-dimensional points.
///
/// Every node carries both a bounding box and a bounding sphere. Inserts
/// descend to the child whose sphere grows the least, and overflowing nodes
/// split on the way back up, growing the tree at the root.
#[derive(Clone, Debug)]
pub struct SRTree<const D: usize> {
    max_entries: usize,
    root: Option<usize>,
    nodes: Vec<Node<D>>,
    num_points: usize,
}

impl<const D: usize> SRTree<D> {
    /// Creates an empty tree whose nodes hold at most `max_entries` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFanout`] if `max_entries < 2`.
    pub fn new(max_entries: usize) -> Result<Self, Error> {
        if max_entries < 2 {
            return Err(Error::InvalidFanout { max_entries });
        }
        Ok(Self::with_fanout(max_entries))
    }

    fn with_fanout(max_entries: usize) -> Self {
        SRTree {
            max_entries,
            root: None,
            nodes: Vec::new(),
            num_points: 0,
        }
    }

    /// Inserts a point. Duplicates are stored as separate entries.
    ///
    /// Coordinates must be finite.
    pub fn insert(&mut self, point: Point<D>) {
        debug_assert!(
            point.iter().all(|x| x.is_finite()),
            "point coordinates must be finite"
        );
        self.num_points += 1;

        let root = match self.root {
            Some(root) => root,
            None => {
                self.root = Some(self.add_slot(Node::leaf(point)));
                return;
            }
        };

        if let Insertion::Split(sibling) = self.insert_entry(root, point) {
            let height = self.nodes[root].height + 1;
            let new_root = self.add_slot(Node::internal(height, vec![root, sibling]));
            self.reshape(new_root);
            self.root = Some(new_root);
            debug!(height, nodes = self.nodes.len(), "root split, tree grew");
        }
    }

    /// Returns `true` if a stored point lies within [`EPSILON`] of `point`.
    #[must_use]
    pub fn search(&self, point: &Point<D>) -> bool {
        let mut queue = self.root.into_iter().collect::<VecDeque<_>>();
        while let Some(slot_id) = queue.pop_front() {
            match &self.nodes[slot_id].entries {
                Entries::Points(points) => {
                    if points.iter().any(|p| euclidean(p, point) < EPSILON) {
                        return true;
                    }
                }
                Entries::Children(children) => {
                    for &child_id in children {
                        let child = &self.nodes[child_id];
                        // The sphere bound is conservative, so the box is
                        // checked too before giving up on a child.
                        let in_sphere = euclidean(point, &child.sphere.center)
                            <= child.sphere.radius + EPSILON;
                        if in_sphere || child.bbox.contains_point_within(point, EPSILON) {
                            queue.push_back(child_id);
                        }
                    }
                }
            }
        }
        false
    }

    /// Returns every stored point inside `query` (boundary included), in
    /// traversal order.
    #[must_use]
    pub fn range_query(&self, query: &Mbb<D>) -> Vec<Point<D>> {
        let mut result = Vec::new();
        let mut queue = self.root.into_iter().collect::<VecDeque<_>>();
        while let Some(slot_id) = queue.pop_front() {
            let node = &self.nodes[slot_id];
            if !node.bbox.intersects(query) {
                continue;
            }
            if query.contains_box(&node.bbox) {
                self.collect_points(slot_id, &mut result);
                continue;
            }
            match &node.entries {
                Entries::Points(points) => {
                    result.extend(points.iter().filter(|p| query.contains_point(*p)).copied());
                }
                Entries::Children(children) => queue.extend(children.iter().copied()),
            }
        }
        result
    }

    /// Returns every stored point within `query.radius` of `query.center`, in
    /// traversal order.
    #[must_use]
    pub fn range_query_sphere(&self, query: &Sphere<D>) -> Vec<Point<D>> {
        let mut result = Vec::new();
        let mut queue = self.root.into_iter().collect::<VecDeque<_>>();
        while let Some(slot_id) = queue.pop_front() {
            let node = &self.nodes[slot_id];
            // Sphere unions are rounded, so allow a little slack before pruning
            let distance = euclidean(&query.center, &node.sphere.center);
            if distance > query.radius + node.sphere.radius + EPSILON {
                continue;
            }
            if node.bbox.max_distance(&query.center) <= query.radius {
                self.collect_points(slot_id, &mut result);
                continue;
            }
            match &node.entries {
                Entries::Points(points) => {
                    result.extend(
                        points
                            .iter()
                            .filter(|p| euclidean(*p, &query.center) <= query.radius)
                            .copied(),
                    );
                }
                Entries::Children(children) => queue.extend(children.iter().copied()),
            }
        }
        result
    }

    /// The `k` stored points closest to `point`, nearest first.
    #[must_use]
    pub fn k_nearest_neighbors(&self, point: &Point<D>, k: usize) -> Vec<Point<D>> {
        self.nearest_neighbors(point, k)
            .into_iter()
            .map(|(neighbor, _)| neighbor)
            .collect()
    }

    /// Best-first k-NN search returning `(point, distance)` pairs sorted by
    /// ascending distance. Returns at most `k` pairs; empty for `k == 0`.
    #[must_use]
    pub fn nearest_neighbors(&self, point: &Point<D>, k: usize) -> Vec<(Point<D>, f64)> {
        let root = match self.root {
            Some(root) if k > 0 => root,
            _ => return Vec::new(),
        };

        // Current best k as (distance, leaf slot, position), worst on top
        let mut neighbors: BinaryHeap<(OrderedFloat<f64>, usize, usize)> =
            BinaryHeap::with_capacity(k + 1);
        // Nodes still to visit, smallest lower bound first
        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((OrderedFloat(0.0), root)));

        while let Some(Reverse((OrderedFloat(bound), slot_id))) = frontier.pop() {
            let kth = kth_distance(&neighbors, k);
            if bound > kth {
                break;
            }

            match &self.nodes[slot_id].entries {
                Entries::Points(points) => {
                    for (i, p) in points.iter().enumerate() {
                        let distance = euclidean(point, p);
                        if neighbors.len() < k {
                            neighbors.push((OrderedFloat(distance), slot_id, i));
                        } else if distance < kth_distance(&neighbors, k) {
                            neighbors.pop();
                            neighbors.push((OrderedFloat(distance), slot_id, i));
                        }
                    }
                }
                Entries::Children(children) => {
                    for &child_id in children {
                        let child_bound = self.nodes[child_id].sphere.min_distance(point);
                        if child_bound < kth {
                            frontier.push(Reverse((OrderedFloat(child_bound), child_id)));
                        }
                    }
                }
            }
        }

        neighbors
            .into_sorted_vec()
            .into_iter()
            .filter_map(|(distance, slot_id, i)| match &self.nodes[slot_id].entries {
                Entries::Points(points) => points.get(i).map(|p| (*p, distance.into_inner())),
                Entries::Children(_) => None,
            })
            .collect()
    }

    /// Number of stored points, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.num_points
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// Number of levels; 0 for an empty tree, 1 when the root is a leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        self.root.map_or(0, |root| self.nodes[root].height)
    }

    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<Mbb<D>> {
        self.root.map(|root| self.nodes[root].bbox)
    }

    #[must_use]
    pub fn bounding_sphere(&self) -> Option<Sphere<D>> {
        self.root.map(|root| self.nodes[root].sphere)
    }

    /// All stored points in depth-first order.
    #[must_use]
    pub fn points(&self) -> Vec<Point<D>> {
        let mut result = Vec::with_capacity(self.num_points);
        if let Some(root) = self.root {
            self.collect_points(root, &mut result);
        }
        result
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            height: self.height(),
            nodes: self.nodes.len(),
            leaves: self.nodes.iter().filter(|node| node.is_leaf()).count(),
            points: self.num_points,
        }
    }

    /// Checks the structural invariants of the whole tree: bounding volumes
    /// cover their entries (spheres up to `tolerance`), fanout stays within
    /// `1..=max_entries`, parent links are consistent and all leaves sit at
    /// the same depth.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self, tolerance: f64) -> Result<(), Error> {
        let root = match self.root {
            Some(root) => root,
            None => return Ok(()),
        };
        if self.nodes[root].parent.is_some() {
            return Err(Error::HeightViolation { node: root });
        }

        let mut stack = vec![root];
        while let Some(slot_id) = stack.pop() {
            let node = &self.nodes[slot_id];
            if node.len() == 0 || node.len() > self.max_entries {
                return Err(Error::FanoutViolation {
                    node: slot_id,
                    entries: node.len(),
                });
            }

            match &node.entries {
                Entries::Points(points) => {
                    if node.height != 1 {
                        return Err(Error::HeightViolation { node: slot_id });
                    }
                    for p in points {
                        if !node.bbox.contains_point(p) {
                            return Err(Error::BoxViolation { node: slot_id });
                        }
                        let excess = euclidean(&node.sphere.center, p) - node.sphere.radius;
                        if excess > tolerance {
                            return Err(Error::SphereViolation {
                                node: slot_id,
                                excess,
                            });
                        }
                    }
                }
                Entries::Children(children) => {
                    for &child_id in children {
                        let child = &self.nodes[child_id];
                        if child.parent != Some(slot_id) || child.height + 1 != node.height {
                            return Err(Error::HeightViolation { node: child_id });
                        }
                        if !node.bbox.contains_box(&child.bbox) {
                            return Err(Error::BoxViolation { node: slot_id });
                        }
                        let excess = euclidean(&node.sphere.center, &child.sphere.center)
                            + child.sphere.radius
                            - node.sphere.radius;
                        if excess > tolerance {
                            return Err(Error::SphereViolation {
                                node: slot_id,
                                excess,
                            });
                        }
                        stack.push(child_id);
                    }
                }
            }
        }
        Ok(())
    }

    /// One CSV row per node, top level first:
    /// `height,is_leaf,entries,min..,max..,center..,radius`.
    #[must_use]
    pub fn nodes_to_string_rows(&self) -> Vec<String> {
        let mut rows = Vec::new();
        for h in (1..=self.height()).rev() {
            for node in &self.nodes {
                if node.height == h {
                    rows.push(node.to_string());
                }
            }
        }
        rows
    }

    // Insert a point into the subtree rooted at `slot_id`.
    // Split the subtree root if it has too many entries
    fn insert_entry(&mut self, slot_id: usize, point: Point<D>) -> Insertion {
        let max_entries = self.max_entries;
        let node = &mut self.nodes[slot_id];
        if let Entries::Points(points) = &mut node.entries {
            points.push(point);
            node.bbox.expand_to_include_point(&point);
            node.sphere.expand_to_include_point(&point);
            if points.len() <= max_entries {
                return Insertion::NoSplit;
            }
            let points = mem::take(points);
            return Insertion::Split(self.split_leaf(slot_id, points));
        }

        let best_child = self.choose_subtree(slot_id, &point);
        let outcome = self.insert_entry(best_child, point);
        self.reshape(slot_id);

        let sibling = match outcome {
            Insertion::NoSplit => return Insertion::NoSplit,
            Insertion::Split(sibling) => sibling,
        };
        if let Entries::Children(children) = &mut self.nodes[slot_id].entries {
            children.push(sibling);
        }
        self.reshape(slot_id);

        if self.nodes[slot_id].len() <= max_entries {
            return Insertion::NoSplit;
        }
        Insertion::Split(self.split_internal(slot_id))
    }

    // The child whose bounding sphere needs the smallest radius increase
    fn choose_subtree(&self, slot_id: usize, point: &Point<D>) -> usize {
        let children = self.children(slot_id);
        let mut best_child = children[0];
        let mut best_increase = f64::INFINITY;
        for &child_id in children {
            let sphere = self.nodes[child_id].sphere;
            let mut grown = sphere;
            grown.expand_to_include_point(point);
            let increase = grown.radius - sphere.radius;
            if increase < best_increase {
                best_increase = increase;
                best_child = child_id;
            }
        }
        best_child
    }

    fn split_leaf(&mut self, slot_id: usize, points: Vec<Point<D>>) -> usize {
        let (seed_a, seed_b) = farthest_pair(&points);
        let anchor_a = points[seed_a];
        let anchor_b = points[seed_b];

        // Every other point follows its closer seed, ties stay in this node
        let mut left = Vec::with_capacity(points.len());
        let mut right = Vec::with_capacity(points.len());
        for (i, point) in points.into_iter().enumerate() {
            if i == seed_a {
                left.push(point);
            } else if i == seed_b {
                right.push(point);
            } else if euclidean(&point, &anchor_a) <= euclidean(&point, &anchor_b) {
                left.push(point);
            } else {
                right.push(point);
            }
        }
        trace!(
            node = slot_id,
            left = left.len(),
            right = right.len(),
            "leaf split"
        );

        self.nodes[slot_id].entries = Entries::Points(left);
        self.nodes[slot_id].reshape_leaf();

        let mut sibling = Node::leaf(anchor_b);
        sibling.entries = Entries::Points(right);
        sibling.parent = self.nodes[slot_id].parent;
        sibling.reshape_leaf();
        self.add_slot(sibling)
    }

    // Children already carry their own bounding volumes, so internal nodes
    // split positionally at the midpoint.
    fn split_internal(&mut self, slot_id: usize) -> usize {
        let mut left = match &mut self.nodes[slot_id].entries {
            Entries::Children(children) => mem::take(children),
            Entries::Points(_) => Vec::new(),
        };
        let right = left.split_off(left.len() / 2);
        trace!(
            node = slot_id,
            left = left.len(),
            right = right.len(),
            "internal split"
        );

        let height = self.nodes[slot_id].height;
        self.nodes[slot_id].entries = Entries::Children(left);
        self.reshape(slot_id);

        let mut sibling = Node::internal(height, right);
        sibling.parent = self.nodes[slot_id].parent;
        let sibling = self.add_slot(sibling);
        self.reshape(sibling);
        sibling
    }

    // Recompute the bounding volumes of a node from scratch.
    // Internal nodes also adopt their children and refresh their height.
    fn reshape(&mut self, slot_id: usize) {
        let children = match &self.nodes[slot_id].entries {
            Entries::Points(_) => {
                self.nodes[slot_id].reshape_leaf();
                return;
            }
            Entries::Children(children) => children.clone(),
        };
        let (first, rest) = match children.split_first() {
            Some((first, rest)) => (*first, rest),
            None => return,
        };

        let mut bbox = self.nodes[first].bbox;
        let mut sphere = self.nodes[first].sphere;
        let mut height = self.nodes[first].height;
        for &child_id in rest {
            let child = &self.nodes[child_id];
            bbox.expand_to_include(&child.bbox);
            sphere.expand_to_include(&child.sphere);
            height = height.max(child.height);
        }
        for &child_id in &children {
            self.nodes[child_id].parent = Some(slot_id);
        }

        let node = &mut self.nodes[slot_id];
        node.bbox = bbox;
        node.sphere = sphere;
        node.height = height + 1;
    }

    fn children(&self, slot_id: usize) -> &[usize] {
        match &self.nodes[slot_id].entries {
            Entries::Children(children) => children,
            Entries::Points(_) => &[],
        }
    }

    fn collect_points(&self, slot_id: usize, result: &mut Vec<Point<D>>) {
        let mut stack = vec![slot_id];
        while let Some(slot_id) = stack.pop() {
            match &self.nodes[slot_id].entries {
                Entries::Points(points) => result.extend_from_slice(points),
                Entries::Children(children) => stack.extend(children.iter().rev()),
            }
        }
    }

    fn add_slot(&mut self, node: Node<D>) -> usize {
        let slot_id = self.nodes.len();
        self.nodes.push(node);
        slot_id
    }
}

impl<const D: usize> Default for SRTree<D> {
    fn default() -> Self {
        Self::with_fanout(DEFAULT_MAX_ENTRIES)
    }
}

// Distance to the worst of the current best k, or infinity while fewer than k
fn kth_distance(neighbors: &BinaryHeap<(OrderedFloat<f64>, usize, usize)>, k: usize) -> f64 {
    if neighbors.len() < k {
        return f64::INFINITY;
    }
    neighbors
        .peek()
        .map_or(f64::INFINITY, |(distance, _, _)| distance.into_inner())
}

// Indices of the two points farthest apart; the first such pair wins ties
fn farthest_pair<const D: usize>(points: &[Point<D>]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut best_distance = f64::NEG_INFINITY;
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            let distance = euclidean(&points[i], &points[j]);
            if distance > best_distance {
                best_distance = distance;
                best = (i, j);
            }
        }
    }
    best
}
