//! Advancing convex hull used during the sweep
//!
//! The hull is a circular doubly-linked list stored in an index arena. Nodes
//! consumed by a fan are unlinked and flagged `removed` rather than freed, so
//! that stale entries in the [`EdgeHash`] can still be recognized and skipped.

use glam::DVec2;

use super::predicates::pseudo_angle;
use super::EMPTY;

/// A boundary point of the triangulation
#[derive(Debug, Clone, Copy)]
pub struct HullNode {
    /// Index of the point in the input
    pub index: usize,
    /// Point coordinates
    pub point: DVec2,
    /// Boundary half-edge running from this node to the next one
    pub halfedge: usize,
    prev: usize,
    next: usize,
    removed: bool,
}

/// Convex hull as a circular list of [`HullNode`]s
///
/// Walking `next` from [`Hull::start`] visits the boundary counter-clockwise on
/// screen (clockwise with the y axis pointing up).
#[derive(Debug, Clone)]
pub struct Hull {
    nodes: Vec<HullNode>,
    start: usize,
    len: usize,
}

impl Hull {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            start: 0,
            len: 0,
        }
    }

    /// Link a new node after `prev`, or start a one-node cycle when `prev` is `None`
    pub(crate) fn insert(&mut self, index: usize, point: DVec2, prev: Option<usize>) -> usize {
        let id = self.nodes.len();
        let (prev, next) = match prev {
            Some(prev) => (prev, self.nodes[prev].next),
            None => (id, id),
        };
        self.nodes.push(HullNode {
            index,
            point,
            halfedge: EMPTY,
            prev,
            next,
            removed: false,
        });
        if prev != id {
            self.nodes[next].prev = id;
            self.nodes[prev].next = id;
        } else {
            self.start = id;
        }
        self.len += 1;
        id
    }

    /// Unlink `id` and move the start of the cycle to its predecessor
    ///
    /// The removed node keeps its own `prev`/`next` so a walk that is standing
    /// on it can continue.
    pub(crate) fn remove(&mut self, id: usize) -> usize {
        let HullNode { prev, next, .. } = self.nodes[id];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[id].removed = true;
        self.start = prev;
        self.len -= 1;
        prev
    }

    pub(crate) fn node_mut(&mut self, id: usize) -> &mut HullNode {
        &mut self.nodes[id]
    }

    /// Point the boundary node whose half-edge is `from` at `to` instead
    pub(crate) fn retarget_halfedge(&mut self, from: usize, to: usize) {
        let mut e = self.start;
        loop {
            if self.nodes[e].halfedge == from {
                self.nodes[e].halfedge = to;
                return;
            }
            e = self.nodes[e].next;
            if e == self.start {
                return;
            }
        }
    }

    #[inline]
    pub(crate) fn is_removed(&self, id: usize) -> bool {
        self.nodes[id].removed
    }

    /// Copy of the live cycle with node ids renumbered along the boundary
    pub(crate) fn compact(&self) -> Hull {
        let mut hull = Hull::with_capacity(self.len);
        let mut prev = None;
        for node in self.iter() {
            let id = hull.insert(node.index, node.point, prev);
            hull.nodes[id].halfedge = node.halfedge;
            prev = Some(id);
        }
        hull.start = 0;
        hull
    }

    /// Node at which boundary walks begin
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn node(&self, id: usize) -> &HullNode {
        &self.nodes[id]
    }

    #[inline]
    pub fn next(&self, id: usize) -> usize {
        self.nodes[id].next
    }

    #[inline]
    pub fn prev(&self, id: usize) -> usize {
        self.nodes[id].prev
    }

    #[inline]
    pub fn point(&self, id: usize) -> DVec2 {
        self.nodes[id].point
    }

    #[inline]
    pub fn index(&self, id: usize) -> usize {
        self.nodes[id].index
    }

    #[inline]
    pub fn halfedge(&self, id: usize) -> usize {
        self.nodes[id].halfedge
    }

    /// Number of boundary points
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Boundary nodes in order, starting at [`Hull::start`]
    pub fn iter(&self) -> HullIter<'_> {
        HullIter {
            hull: self,
            current: if self.nodes.is_empty() { EMPTY } else { self.start },
        }
    }

    /// Input indices of the boundary points in order
    pub fn indices(&self) -> Vec<usize> {
        self.iter().map(|node| node.index).collect()
    }
}

/// Iterator over the live nodes of a [`Hull`]
pub struct HullIter<'a> {
    hull: &'a Hull,
    current: usize,
}

impl<'a> Iterator for HullIter<'a> {
    type Item = &'a HullNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == EMPTY {
            return None;
        }
        let node = &self.hull.nodes[self.current];
        self.current = if node.next == self.hull.start {
            EMPTY
        } else {
            node.next
        };
        Some(node)
    }
}

impl std::iter::FusedIterator for HullIter<'_> {}

/// Angular bucket table over the advancing hull
///
/// Maps the pseudo-angle of a point around the seed circumcenter to the most
/// recently hashed hull node at that angle, giving a near-constant-time
/// starting point for the visible-edge search.
#[derive(Debug)]
pub(crate) struct EdgeHash {
    center: DVec2,
    buckets: Vec<usize>,
}

impl EdgeHash {
    pub(crate) fn new(center: DVec2, point_count: usize) -> Self {
        let size = ((point_count as f64).sqrt().ceil() as usize).max(1);
        Self {
            center,
            buckets: vec![EMPTY; size],
        }
    }

    #[inline]
    fn key(&self, point: DVec2) -> usize {
        let size = self.buckets.len();
        ((pseudo_angle(point - self.center) * size as f64).floor() as usize) % size
    }

    pub(crate) fn insert(&mut self, hull: &Hull, id: usize) {
        let key = self.key(hull.point(id));
        self.buckets[key] = id;
    }

    /// First live node at or after the bucket of `point`
    pub(crate) fn find(&self, hull: &Hull, point: DVec2) -> Option<usize> {
        let start_key = self.key(point);
        let mut key = start_key;
        loop {
            let id = self.buckets[key];
            if id != EMPTY && !hull.is_removed(id) {
                return Some(id);
            }
            key = (key + 1) % self.buckets.len();
            if key == start_key {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Hull {
        let mut hull = Hull::with_capacity(4);
        let mut prev = None;
        for (i, p) in [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)].into_iter().enumerate() {
            prev = Some(hull.insert(i, DVec2::new(p.0, p.1), prev));
        }
        hull
    }

    #[test]
    fn test_insert_keeps_cycle() {
        let hull = square();
        assert_eq!(hull.len(), 4);
        assert_eq!(hull.indices(), vec![0, 1, 2, 3]);
        for id in 0..4 {
            assert_eq!(hull.prev(hull.next(id)), id);
        }
    }

    #[test]
    fn test_remove_unlinks_but_keeps_pointers() {
        let mut hull = square();
        let prev = hull.remove(2);
        assert_eq!(prev, 1);
        assert_eq!(hull.start(), 1);
        assert!(hull.is_removed(2));
        assert_eq!(hull.next(1), 3);
        // a walk standing on the removed node can still step forward
        assert_eq!(hull.next(2), 3);
        assert_eq!(hull.indices(), vec![1, 3, 0]);
    }

    #[test]
    fn test_compact_renumbers_live_nodes() {
        let mut hull = square();
        hull.node_mut(3).halfedge = 7;
        hull.remove(1);
        let compact = hull.compact();
        assert_eq!(compact.len(), 3);
        assert_eq!(compact.start(), 0);
        assert_eq!(compact.indices(), hull.indices());
        assert!(compact.iter().any(|node| node.halfedge == 7));
    }

    #[test]
    fn test_retarget_halfedge() {
        let mut hull = square();
        for id in 0..4 {
            hull.node_mut(id).halfedge = 10 + id;
        }
        hull.retarget_halfedge(12, 99);
        assert_eq!(hull.halfedge(2), 99);
        assert_eq!(hull.halfedge(1), 11);
    }

    #[test]
    fn test_edge_hash_skips_removed_nodes() {
        let mut hull = square();
        let mut hash = EdgeHash::new(DVec2::new(0.5, 0.5), 4);
        for id in 0..4 {
            hash.insert(&hull, id);
        }
        let probe = DVec2::new(1.0, 1.0);
        let found = hash.find(&hull, probe).unwrap();
        hull.remove(found);
        let next = hash.find(&hull, probe).unwrap();
        assert_ne!(next, found);
        assert!(!hull.is_removed(next));
    }
}
