//! Incremental sweep-hull Delaunay triangulation
//!
//! Points are inserted in order of distance from a seed triangle's
//! circumcenter. Each new point lies outside the current convex hull, so it is
//! fanned onto the hull edges it can see and the new triangles are
//! legalized by edge flips.
//!
//! # Output layout
//!
//! - `triangles`: `3m` point indices, one triple per triangle, counter-clockwise
//!   on screen (y axis pointing down).
//! - `halfedges`: for half-edge `e` (from `triangles[e]` to
//!   `triangles[next_halfedge(e)]`), the index of the opposite half-edge, or
//!   [`EMPTY`] on the hull.
//! - `hull`: the boundary cycle, see [`Hull`].

mod hull;
mod predicates;
mod sort;

pub use hull::{Hull, HullIter, HullNode};
pub use predicates::{circumcenter, circumradius2, in_circle, orient, pseudo_angle};

use glam::DVec2;
use tracing::{debug, trace};

use crate::error::{Result, VoronoiError};
use hull::EdgeHash;
use sort::sort_by_distance;

/// Marks a half-edge without an opposite (on the convex hull) and unset
/// per-point edge indices.
pub const EMPTY: usize = usize::MAX;

/// Points closer than this on both axes to the previously inserted point are
/// skipped as duplicates.
pub const EPSILON: f64 = f64::EPSILON;

/// Next half-edge within the same triangle
#[inline]
pub fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 {
        e - 2
    } else {
        e + 1
    }
}

/// Previous half-edge within the same triangle
#[inline]
pub fn prev_halfedge(e: usize) -> usize {
    if e % 3 == 0 {
        e + 2
    } else {
        e - 1
    }
}

/// Triangle that owns half-edge `e`
#[inline]
pub fn triangle_of_edge(e: usize) -> usize {
    e / 3
}

/// A completed Delaunay triangulation
///
/// Immutable once built; triangulating a different point set means building
/// a new instance.
#[derive(Debug, Clone)]
pub struct Triangulation {
    triangles: Vec<usize>,
    halfedges: Vec<usize>,
    hull: Hull,
}

impl Triangulation {
    /// Triangulate `points`
    ///
    /// Near-duplicate points (within [`EPSILON`] on both axes) are left out of
    /// the mesh; they show up later as sites without any incident edge.
    ///
    /// # Errors
    ///
    /// - `InsufficientPoints` for fewer than three points
    /// - `NonFiniteCoordinate` if any coordinate is NaN or infinite
    /// - `DegenerateInput` if every candidate seed triangle is degenerate
    ///   (all points collinear or coincident)
    ///
    /// # Example
    ///
    /// ```rust
    /// use rust_planar_voronoi::triangulation::Triangulation;
    /// use glam::DVec2;
    ///
    /// let points = [
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(10.0, 0.0),
    ///     DVec2::new(10.0, 10.0),
    ///     DVec2::new(0.0, 10.0),
    /// ];
    /// let triangulation = Triangulation::new(&points).unwrap();
    /// assert_eq!(triangulation.triangle_count(), 2);
    /// assert_eq!(triangulation.hull().len(), 4);
    /// ```
    pub fn new(points: &[DVec2]) -> Result<Self> {
        let n = points.len();
        if n < 3 {
            return Err(VoronoiError::InsufficientPoints(n));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(VoronoiError::NonFiniteCoordinate(i));
        }

        let (i0, i1, i2) = find_seed_triangle(points)?;
        let center = circumcenter(points[i0], points[i1], points[i2]);

        let mut ids: Vec<usize> = (0..n).collect();
        sort_by_distance(&mut ids, points, center);

        let mut sweep = Sweep::new(points, center);
        sweep.seed(i0, i1, i2);

        let mut skipped = 0;
        let mut previous: Option<DVec2> = None;
        for &i in &ids {
            let p = points[i];
            if let Some(prev) = previous {
                if (p.x - prev.x).abs() <= EPSILON && (p.y - prev.y).abs() <= EPSILON {
                    skipped += 1;
                    continue;
                }
            }
            previous = Some(p);

            if i == i0 || i == i1 || i == i2 {
                continue;
            }
            if !sweep.insert(i) {
                skipped += 1;
            }
        }

        let triangulation = sweep.finish();
        debug!(
            points = n,
            triangles = triangulation.triangle_count(),
            hull = triangulation.hull.len(),
            skipped,
            "triangulation complete"
        );
        Ok(triangulation)
    }

    /// Point indices, three per triangle
    #[inline]
    pub fn triangles(&self) -> &[usize] {
        &self.triangles
    }

    /// Opposite half-edge per half-edge, [`EMPTY`] on the hull
    #[inline]
    pub fn halfedges(&self) -> &[usize] {
        &self.halfedges
    }

    #[inline]
    pub fn hull(&self) -> &Hull {
        &self.hull
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// The three point indices of triangle `t`
    ///
    /// # Panics
    ///
    /// Panics if `t` is not a triangle of this mesh.
    pub fn triangle(&self, t: usize) -> [usize; 3] {
        assert!(
            t < self.triangle_count(),
            "triangle {} out of range ({} triangles)",
            t,
            self.triangle_count()
        );
        [
            self.triangles[3 * t],
            self.triangles[3 * t + 1],
            self.triangles[3 * t + 2],
        ]
    }
}

/// Pick the seed triangle: the point nearest the bounding-box center, its
/// nearest neighbor, and the point that forms the smallest circumcircle with
/// both. Returned in mesh orientation.
fn find_seed_triangle(points: &[DVec2]) -> Result<(usize, usize, usize)> {
    let (min, max) = points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(min, max), &p| (min.min(p), max.max(p)),
    );
    let center = (min + max) / 2.0;

    // `min_by` keeps the first of equal candidates, so ties resolve by index.
    let i0 = (0..points.len())
        .min_by(|&a, &b| {
            center
                .distance_squared(points[a])
                .total_cmp(&center.distance_squared(points[b]))
        })
        .ok_or(VoronoiError::DegenerateInput)?;
    let p0 = points[i0];

    let i1 = (0..points.len())
        .filter(|&i| i != i0 && p0.distance_squared(points[i]) > 0.0)
        .min_by(|&a, &b| {
            p0.distance_squared(points[a])
                .total_cmp(&p0.distance_squared(points[b]))
        })
        .ok_or(VoronoiError::DegenerateInput)?;
    let p1 = points[i1];

    let (i2, radius) = (0..points.len())
        .filter(|&i| i != i0 && i != i1)
        .map(|i| (i, circumradius2(p0, p1, points[i])))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or(VoronoiError::DegenerateInput)?;
    if radius == f64::INFINITY {
        return Err(VoronoiError::DegenerateInput);
    }

    if orient(p0, p1, points[i2]) {
        Ok((i0, i2, i1))
    } else {
        Ok((i0, i1, i2))
    }
}

/// Working state of one triangulation run
struct Sweep<'a> {
    coords: &'a [DVec2],
    triangles: Vec<usize>,
    halfedges: Vec<usize>,
    triangles_len: usize,
    hull: Hull,
    hash: EdgeHash,
    edge_stack: Vec<usize>,
    flips: usize,
}

impl<'a> Sweep<'a> {
    fn new(coords: &'a [DVec2], center: DVec2) -> Self {
        let n = coords.len();
        let max_triangles = (2 * n).saturating_sub(5).max(1);
        Self {
            coords,
            triangles: vec![0; max_triangles * 3],
            halfedges: vec![EMPTY; max_triangles * 3],
            triangles_len: 0,
            hull: Hull::with_capacity(n),
            hash: EdgeHash::new(center, n),
            edge_stack: Vec::new(),
            flips: 0,
        }
    }

    fn seed(&mut self, i0: usize, i1: usize, i2: usize) {
        let mut prev = None;
        for (halfedge, i) in [i0, i1, i2].into_iter().enumerate() {
            let id = self.hull.insert(i, self.coords[i], prev);
            self.hull.node_mut(id).halfedge = halfedge;
            self.hash.insert(&self.hull, id);
            prev = Some(id);
        }
        self.add_triangle(i0, i1, i2, EMPTY, EMPTY, EMPTY);
    }

    /// Fan point `i` onto every hull edge visible from it
    ///
    /// Returns `false` when no visible edge exists, which only happens for a
    /// near-duplicate of a hull point.
    fn insert(&mut self, i: usize) -> bool {
        let p = self.coords[i];

        let found = self
            .hash
            .find(&self.hull, p)
            .unwrap_or_else(|| self.hull.start());
        let start = self.hull.prev(found);
        let mut e = start;
        while !orient(p, self.hull.point(e), self.hull.point(self.hull.next(e))) {
            e = self.hull.next(e);
            if e == start {
                return false;
            }
        }
        let walk_back = e == start;

        let next = self.hull.next(e);
        let t = self.add_triangle(
            self.hull.index(e),
            i,
            self.hull.index(next),
            EMPTY,
            EMPTY,
            self.hull.halfedge(e),
        );
        self.hull.node_mut(e).halfedge = t;
        let e = self.hull.insert(i, p, Some(e));
        let boundary = self.legalize(t + 2);
        self.hull.node_mut(e).halfedge = boundary;

        // walk forward through the hull
        let mut q = self.hull.next(e);
        while orient(p, self.hull.point(q), self.hull.point(self.hull.next(q))) {
            let prev = self.hull.prev(q);
            let t = self.add_triangle(
                self.hull.index(q),
                i,
                self.hull.index(self.hull.next(q)),
                self.hull.halfedge(prev),
                EMPTY,
                self.hull.halfedge(q),
            );
            let boundary = self.legalize(t + 2);
            self.hull.node_mut(prev).halfedge = boundary;
            self.hull.remove(q);
            q = self.hull.next(q);
        }

        // walk backward from the other side
        if walk_back {
            let mut q = self.hull.prev(e);
            while orient(p, self.hull.point(self.hull.prev(q)), self.hull.point(q)) {
                let prev = self.hull.prev(q);
                let t = self.add_triangle(
                    self.hull.index(prev),
                    i,
                    self.hull.index(q),
                    EMPTY,
                    self.hull.halfedge(q),
                    self.hull.halfedge(prev),
                );
                self.legalize(t + 2);
                self.hull.node_mut(prev).halfedge = t;
                self.hull.remove(q);
                q = self.hull.prev(q);
            }
        }

        self.hash.insert(&self.hull, e);
        let before = self.hull.prev(e);
        self.hash.insert(&self.hull, before);
        true
    }

    /// Flip edges until the triangles around `a` satisfy the Delaunay condition
    ///
    /// Returns the half-edge that ends up on the far side of `a`'s triangle.
    ///
    /// ```text
    ///           pl                    pl
    ///          /||\                  /  \
    ///       al/ || \bl            al/    \a
    ///        /  ||  \              /      \
    ///       /  a||b  \    flip    /___ar___\
    ///     p0\   ||   /p1   =>   p0\---bl---/p1
    ///        \  ||  /              \      /
    ///       ar\ || /br             b\    /br
    ///          \||/                  \  /
    ///           pr                    pr
    /// ```
    fn legalize(&mut self, mut a: usize) -> usize {
        let mut ar;
        loop {
            let b = self.halfedges[a];
            let a0 = a - a % 3;
            ar = a0 + (a + 2) % 3;

            if b == EMPTY {
                match self.edge_stack.pop() {
                    Some(edge) => {
                        a = edge;
                        continue;
                    }
                    None => break,
                }
            }

            let b0 = b - b % 3;
            let al = a0 + (a + 1) % 3;
            let bl = b0 + (b + 2) % 3;

            let p0 = self.triangles[ar];
            let pr = self.triangles[a];
            let pl = self.triangles[al];
            let p1 = self.triangles[bl];

            let illegal = in_circle(
                self.coords[p0],
                self.coords[pr],
                self.coords[pl],
                self.coords[p1],
            );

            if illegal {
                self.flips += 1;
                self.triangles[a] = p1;
                self.triangles[b] = p0;

                let hbl = self.halfedges[bl];
                // edge swapped on the other side of the hull (rare)
                if hbl == EMPTY {
                    self.hull.retarget_halfedge(bl, a);
                }
                self.link(a, hbl);
                self.link(b, self.halfedges[ar]);
                self.link(ar, bl);

                let br = b0 + (b + 1) % 3;
                self.edge_stack.push(br);
            } else {
                match self.edge_stack.pop() {
                    Some(edge) => a = edge,
                    None => break,
                }
            }
        }
        ar
    }

    #[inline]
    fn link(&mut self, a: usize, b: usize) {
        self.halfedges[a] = b;
        if b != EMPTY {
            self.halfedges[b] = a;
        }
    }

    /// Append triangle `(i0, i1, i2)` linked to the given opposite half-edges
    fn add_triangle(&mut self, i0: usize, i1: usize, i2: usize, a: usize, b: usize, c: usize) -> usize {
        let t = self.triangles_len;

        self.triangles[t] = i0;
        self.triangles[t + 1] = i1;
        self.triangles[t + 2] = i2;

        self.link(t, a);
        self.link(t + 1, b);
        self.link(t + 2, c);

        self.triangles_len += 3;
        t
    }

    fn finish(mut self) -> Triangulation {
        self.triangles.truncate(self.triangles_len);
        self.triangles.shrink_to_fit();
        self.halfedges.truncate(self.triangles_len);
        self.halfedges.shrink_to_fit();
        trace!(flips = self.flips, "legalization finished");

        Triangulation {
            triangles: self.triangles,
            halfedges: self.halfedges,
            hull: self.hull.compact(),
        }
    }
}
