//! Delaunay mesh with point-to-edge indices
//!
//! Wraps a [`Triangulation`] with one incoming and one outgoing half-edge per
//! point, which makes walking the triangles around a site O(degree). On top of
//! that it offers neighbor enumeration, greedy point location and polygon
//! output for triangles and the hull.

use glam::DVec2;
use tracing::trace;

use crate::config::{Bounds, PointAccessor};
use crate::error::{Result, VoronoiError};
use crate::path::{PathSink, Polygon};
use crate::triangulation::{next_halfedge, Hull, Triangulation, EMPTY};
use crate::voronoi::Voronoi;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Delaunay triangulation of a planar point set
///
/// Sites keep the index they had in the input. Sites that were dropped from
/// the mesh as near-duplicates have no incident edge and are reported as
/// coincident.
///
/// # Example
///
/// ```rust
/// use rust_planar_voronoi::Delaunay;
/// use glam::DVec2;
///
/// let delaunay = Delaunay::new(vec![
///     DVec2::new(0.0, 0.0),
///     DVec2::new(10.0, 0.0),
///     DVec2::new(10.0, 10.0),
///     DVec2::new(0.0, 10.0),
/// ])
/// .unwrap();
///
/// assert_eq!(delaunay.triangle_count(), 2);
/// assert_eq!(delaunay.locate(9.0, 8.0, 0), Some(2));
/// assert!(delaunay.neighbors(0).any(|j| j == 1));
/// ```
#[derive(Debug, Clone)]
pub struct Delaunay {
    points: Vec<DVec2>,
    triangulation: Triangulation,
    inedges: Vec<usize>,
    outedges: Vec<usize>,
}

impl Delaunay {
    /// Triangulate `points`
    ///
    /// # Errors
    ///
    /// See [`Triangulation::new`].
    pub fn new(points: Vec<DVec2>) -> Result<Self> {
        let triangulation = Triangulation::new(&points)?;
        let n = points.len();
        let triangles = triangulation.triangles();
        let halfedges = triangulation.halfedges();

        let mut inedges = vec![EMPTY; n];
        let mut outedges = vec![EMPTY; n];

        // an arbitrary incoming half-edge per point
        for e in 0..halfedges.len() {
            inedges[triangles[next_halfedge(e)]] = e;
        }

        // hull points get the boundary edges, so walks start and end on the hull
        let hull = triangulation.hull();
        let mut id = hull.start();
        loop {
            let next = hull.next(id);
            inedges[hull.index(next)] = hull.halfedge(id);
            outedges[hull.index(id)] = hull.halfedge(id);
            id = next;
            if id == hull.start() {
                break;
            }
        }

        Ok(Self {
            points,
            triangulation,
            inedges,
            outedges,
        })
    }

    /// Triangulate a flat `[x0, y0, x1, y1, ..]` coordinate array
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an odd number of coordinates, otherwise see
    /// [`Triangulation::new`].
    pub fn from_coords(coords: &[f64]) -> Result<Self> {
        if coords.len() % 2 != 0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "flat coordinate array must have even length (got {})",
                coords.len()
            )));
        }
        let points = coords
            .chunks_exact(2)
            .map(|xy| DVec2::new(xy[0], xy[1]))
            .collect();
        Self::new(points)
    }

    /// Triangulate arbitrary point records through `accessor`
    pub fn from_points<P>(points: &[P], accessor: &PointAccessor<P>) -> Result<Self> {
        Self::new(points.iter().map(|p| accessor.get(p)).collect())
    }

    /// Build the Voronoi diagram of this mesh clipped to `bounds`
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` if `bounds` is inverted.
    pub fn voronoi(self, bounds: Bounds) -> Result<Voronoi> {
        Voronoi::new(self, bounds)
    }

    #[inline]
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Coordinates of site `i`
    #[inline]
    pub fn point(&self, i: usize) -> DVec2 {
        self.points[i]
    }

    #[inline]
    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    #[inline]
    pub fn triangles(&self) -> &[usize] {
        self.triangulation.triangles()
    }

    #[inline]
    pub fn halfedges(&self) -> &[usize] {
        self.triangulation.halfedges()
    }

    #[inline]
    pub fn hull(&self) -> &Hull {
        self.triangulation.hull()
    }

    /// One half-edge ending at each point, [`EMPTY`] for coincident points
    #[inline]
    pub fn inedges(&self) -> &[usize] {
        &self.inedges
    }

    /// For hull points, the boundary half-edge leaving the point
    #[inline]
    pub fn outedges(&self) -> &[usize] {
        &self.outedges
    }

    /// Number of input sites, including coincident ones
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangulation.triangle_count()
    }

    /// Whether site `i` was left out of the mesh
    #[inline]
    pub fn is_coincident(&self, i: usize) -> bool {
        self.inedges[i] == EMPTY
    }

    /// Sites sharing a Delaunay edge with site `i`
    ///
    /// The sequence is finite and starts over only by calling this again.
    /// It is empty for a coincident site.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a site index.
    pub fn neighbors(&self, i: usize) -> Neighbors<'_> {
        self.check_site(i);
        let start = self.inedges[i];
        Neighbors {
            delaunay: self,
            site: i,
            start,
            edge: start,
            last: EMPTY,
            done: start == EMPTY,
        }
    }

    /// Site nearest to `(x, y)`, found by walking from site `hint`
    ///
    /// Each step moves to whichever neighbor is strictly closer to the
    /// query, so the walk stops at a site none of whose neighbors is closer.
    /// On a Delaunay mesh that site is the nearest one. Returns `None` when
    /// `hint` is a coincident site.
    ///
    /// # Panics
    ///
    /// Panics if `hint` is not a site index.
    pub fn locate(&self, x: f64, y: f64, hint: usize) -> Option<usize> {
        self.check_site(hint);
        let target = DVec2::new(x, y);
        let mut i = hint;
        loop {
            let c = self.step(i, target)?;
            if c == i {
                return Some(c);
            }
            i = c;
        }
    }

    /// One greedy step of [`Delaunay::locate`] from site `i`
    pub(crate) fn step(&self, i: usize, target: DVec2) -> Option<usize> {
        if self.inedges[i] == EMPTY {
            return None;
        }
        let mut c = i;
        let mut dc = target.distance_squared(self.points[i]);
        for t in self.neighbors(i) {
            let dt = target.distance_squared(self.points[t]);
            if dt < dc {
                dc = dt;
                c = t;
            }
        }
        Some(c)
    }

    /// Draw every Delaunay edge once, then the hull
    pub fn render<S: PathSink>(&self, sink: &mut S) {
        let triangles = self.triangles();
        for (e, &opposite) in self.halfedges().iter().enumerate() {
            if opposite == EMPTY || opposite < e {
                continue;
            }
            let p = self.points[triangles[e]];
            let q = self.points[triangles[opposite]];
            sink.move_to(p.x, p.y);
            sink.line_to(q.x, q.y);
        }
        self.render_hull(sink);
    }

    /// Draw the convex hull as one closed subpath
    pub fn render_hull<S: PathSink>(&self, sink: &mut S) {
        let mut nodes = self.hull().iter();
        if let Some(first) = nodes.next() {
            sink.move_to(first.point.x, first.point.y);
            for node in nodes {
                sink.line_to(node.point.x, node.point.y);
            }
            sink.close_path();
        }
    }

    /// Draw triangle `t` as one closed subpath
    ///
    /// # Panics
    ///
    /// Panics if `t` is not a triangle index.
    pub fn render_triangle<S: PathSink>(&self, t: usize, sink: &mut S) {
        let [a, b, c] = self.triangulation.triangle(t);
        let (a, b, c) = (self.points[a], self.points[b], self.points[c]);
        sink.move_to(a.x, a.y);
        sink.line_to(b.x, b.y);
        sink.line_to(c.x, c.y);
        sink.close_path();
    }

    /// Draw a circle of `radius` around every site
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `radius` is negative or not finite.
    pub fn render_points<S: PathSink>(&self, sink: &mut S, radius: f64) -> Result<()> {
        if !(radius >= 0.0) || !radius.is_finite() {
            return Err(VoronoiError::InvalidConfig(format!(
                "point radius must be finite and >= 0 (got {})",
                radius
            )));
        }
        for p in &self.points {
            sink.move_to(p.x + radius, p.y);
            sink.arc(p.x, p.y, radius);
        }
        Ok(())
    }

    /// Closed vertex ring of the convex hull
    pub fn hull_polygon(&self) -> Vec<DVec2> {
        let mut polygon = Polygon::new();
        self.render_hull(&mut polygon);
        polygon.into_value().unwrap_or_default()
    }

    /// Closed vertex ring of triangle `t`
    ///
    /// # Panics
    ///
    /// Panics if `t` is not a triangle index.
    pub fn triangle_polygon(&self, t: usize) -> Vec<DVec2> {
        let mut polygon = Polygon::new();
        self.render_triangle(t, &mut polygon);
        polygon.into_value().unwrap_or_default()
    }

    /// Closed vertex rings of all triangles, in triangle order
    pub fn triangle_polygons(&self) -> impl Iterator<Item = Vec<DVec2>> + '_ {
        (0..self.triangle_count()).map(move |t| self.triangle_polygon(t))
    }

    /// Exact nearest-site index over all input points
    #[cfg(feature = "spatial-index")]
    pub fn spatial_index(&self) -> SpatialIndex {
        SpatialIndex::new(&self.points)
    }

    #[inline]
    fn check_site(&self, i: usize) {
        assert!(
            i < self.points.len(),
            "site {} out of range ({} sites)",
            i,
            self.points.len()
        );
    }
}

/// Cursor over the neighbors of one site, see [`Delaunay::neighbors`]
///
/// Rotates around the site one triangle at a time. For a hull site the
/// rotation runs into the boundary, and the far end of the site's outgoing
/// hull edge is reported last. A half-edge that does not touch the site ends
/// the walk early.
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    delaunay: &'a Delaunay,
    site: usize,
    start: usize,
    edge: usize,
    last: usize,
    done: bool,
}

impl Iterator for Neighbors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        let triangles = self.delaunay.triangles();

        if self.edge == EMPTY {
            self.done = true;
            let out = self.delaunay.outedges[self.site];
            if out == EMPTY {
                return None;
            }
            let p = triangles[next_halfedge(out)];
            return if p != self.last { Some(p) } else { None };
        }

        let p = triangles[self.edge];
        self.last = p;
        let e = next_halfedge(self.edge);
        if triangles[e] != self.site {
            trace!(site = self.site, edge = e, "inconsistent triangulation, neighbor walk truncated");
            self.done = true;
        } else {
            let opposite = self.delaunay.halfedges()[e];
            if opposite == self.start {
                self.done = true;
            } else {
                self.edge = opposite;
            }
        }
        Some(p)
    }
}

impl std::iter::FusedIterator for Neighbors<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::SvgPath;
    use crate::triangulation::triangle_of_edge;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_points(count: usize, seed: u64) -> Vec<DVec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| DVec2::new(rng.gen_range(0.0..500.0), rng.gen_range(0.0..500.0)))
            .collect()
    }

    fn square() -> Delaunay {
        Delaunay::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
        ])
        .unwrap()
    }

    fn brute_force_nearest(points: &[DVec2], target: DVec2) -> usize {
        (0..points.len())
            .min_by(|&a, &b| {
                target
                    .distance_squared(points[a])
                    .total_cmp(&target.distance_squared(points[b]))
            })
            .unwrap()
    }

    #[test]
    fn test_edge_indices() {
        let delaunay = Delaunay::new(random_points(200, 1)).unwrap();
        let triangles = delaunay.triangles();
        for (i, &e) in delaunay.inedges().iter().enumerate() {
            assert_ne!(e, EMPTY);
            assert_eq!(triangles[next_halfedge(e)], i);
        }
        for node in delaunay.hull().iter() {
            let out = delaunay.outedges()[node.index];
            assert_eq!(triangles[out], node.index);
            assert_eq!(delaunay.halfedges()[out], EMPTY);
            // hull points start their walk on the boundary
            assert_eq!(delaunay.halfedges()[delaunay.inedges()[node.index]], EMPTY);
        }
    }

    #[test]
    fn test_neighbors_match_edges() {
        let delaunay = Delaunay::new(random_points(300, 2)).unwrap();
        let n = delaunay.len();
        let mut expected = vec![Vec::new(); n];
        let triangles = delaunay.triangles();
        for e in 0..triangles.len() {
            let (a, b) = (triangles[e], triangles[next_halfedge(e)]);
            expected[a].push(b);
            expected[b].push(a);
        }
        for (i, mut expected) in expected.into_iter().enumerate() {
            expected.sort_unstable();
            expected.dedup();
            let mut actual: Vec<usize> = delaunay.neighbors(i).collect();
            let count = actual.len();
            actual.sort_unstable();
            actual.dedup();
            assert_eq!(count, actual.len(), "site {} yields a neighbor twice", i);
            assert_eq!(actual, expected, "site {}", i);
        }
    }

    #[test]
    fn test_neighbor_symmetry() {
        let delaunay = Delaunay::new(random_points(150, 3)).unwrap();
        for i in 0..delaunay.len() {
            for j in delaunay.neighbors(i) {
                assert!(
                    delaunay.neighbors(j).any(|k| k == i),
                    "{} lists {} but not the other way round",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_square_neighbors() {
        let delaunay = square();
        for i in 0..4 {
            let neighbors: Vec<usize> = delaunay.neighbors(i).collect();
            assert!(neighbors.contains(&((i + 1) % 4)));
            assert!(neighbors.contains(&((i + 3) % 4)));
            assert!(!neighbors.contains(&i));
        }
    }

    #[test]
    fn test_locate_matches_brute_force() {
        let points = random_points(400, 4);
        let delaunay = Delaunay::new(points.clone()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(40);
        for _ in 0..500 {
            let target = DVec2::new(rng.gen_range(-50.0..550.0), rng.gen_range(-50.0..550.0));
            let hint = rng.gen_range(0..points.len());
            let found = delaunay.locate(target.x, target.y, hint).unwrap();
            let nearest = brute_force_nearest(&points, target);
            assert_eq!(
                target.distance_squared(points[found]),
                target.distance_squared(points[nearest])
            );
        }
    }

    #[test]
    fn test_locate_is_a_fixed_point() {
        let delaunay = Delaunay::new(random_points(100, 5)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(50);
        for _ in 0..100 {
            let (x, y) = (rng.gen_range(0.0..500.0), rng.gen_range(0.0..500.0));
            let hint = rng.gen_range(0..delaunay.len());
            let site = delaunay.locate(x, y, hint).unwrap();
            assert_eq!(delaunay.locate(x, y, site), Some(site));
        }
    }

    #[test]
    fn test_coincident_site() {
        let mut points = random_points(50, 6);
        points.push(points[7]);
        let delaunay = Delaunay::new(points).unwrap();
        let coincident = if delaunay.is_coincident(50) { 50 } else { 7 };
        assert!(delaunay.is_coincident(coincident));
        assert_eq!(delaunay.neighbors(coincident).count(), 0);
        assert_eq!(delaunay.locate(1.0, 1.0, coincident), None);
        // walks from other sites never land on it
        let p = delaunay.point(coincident);
        let found = delaunay.locate(p.x, p.y, 0).unwrap();
        assert_ne!(found, coincident);
        assert_eq!(delaunay.point(found), p);
    }

    #[test]
    fn test_walks_stop_on_inconsistent_edges() {
        let mut delaunay = Delaunay::from_coords(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, 5.0, 5.0]).unwrap();
        assert_eq!(delaunay.neighbors(4).count(), 4);

        // the center now claims an edge that ends at corner 0
        let foreign = delaunay.inedges[0];
        delaunay.inedges[4] = foreign;
        let predecessor = delaunay.triangles()[foreign];
        assert!(predecessor == 1 || predecessor == 3);
        assert_eq!(delaunay.neighbors(4).collect::<Vec<_>>(), vec![predecessor]);
        // other sites still walk their full fan
        assert_eq!(delaunay.neighbors(2).count(), 3);

        let voronoi = delaunay
            .voronoi(Bounds::new(-1.0, -1.0, 11.0, 11.0).unwrap())
            .unwrap();
        let vertex = voronoi.circumcenters()[triangle_of_edge(foreign)];
        assert!((vertex - DVec2::new(5.0, 0.0)).length() < 1e-9 || (vertex - DVec2::new(0.0, 5.0)).length() < 1e-9);
        assert_eq!(voronoi.cell_polygon(4), Some(vec![vertex, vertex]));
        assert!(voronoi.cell_polygon(2).is_some());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_neighbors_out_of_range() {
        square().neighbors(4);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_locate_out_of_range() {
        square().locate(0.0, 0.0, 99);
    }

    #[test]
    fn test_constructors_agree() {
        let coords = [0.0, 0.0, 4.0, 0.0, 0.0, 3.0, 5.0, 5.0];
        let flat = Delaunay::from_coords(&coords).unwrap();
        let pairs: Vec<[f64; 2]> = coords.chunks(2).map(|c| [c[0], c[1]]).collect();
        let records = Delaunay::from_points(&pairs, &PointAccessor::default()).unwrap();
        assert_eq!(flat.triangles(), records.triangles());
        assert_eq!(flat.points(), records.points());
        assert!(Delaunay::from_coords(&coords[..7]).is_err());
    }

    #[test]
    fn test_polygons_are_closed() {
        let delaunay = square();
        let hull = delaunay.hull_polygon();
        assert_eq!(hull.len(), 5);
        assert_eq!(hull.first(), hull.last());

        let triangles: Vec<Vec<DVec2>> = delaunay.triangle_polygons().collect();
        assert_eq!(triangles.len(), 2);
        for ring in &triangles {
            assert_eq!(ring.len(), 4);
            assert_eq!(ring.first(), ring.last());
        }
        assert_eq!(delaunay.triangle_polygon(1), triangles[1]);
    }

    #[test]
    fn test_render_draws_each_edge_once() {
        let delaunay = square();
        let mut path = SvgPath::new();
        delaunay.render(&mut path);
        let data = path.into_value().unwrap();
        // one diagonal plus the hull
        assert_eq!(data.matches('M').count(), 2);
        assert_eq!(data.matches('L').count(), 4);
        assert!(data.ends_with('Z'));
    }

    #[test]
    fn test_render_points() {
        let delaunay = square();
        let mut path = SvgPath::new();
        delaunay.render_points(&mut path, 2.0).unwrap();
        assert_eq!(path.value().unwrap().matches('A').count(), 8);
        assert!(delaunay.render_points(&mut path, -1.0).is_err());

        // each circle: its start once, the remaining chords, then the close
        let mut polygon = Polygon::new();
        delaunay.render_points(&mut polygon, 1.0).unwrap();
        assert_eq!(polygon.vertices().len(), 4 * (crate::path::ARC_SEGMENTS + 1));
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_locate_agrees_with_spatial_index() {
        let points = random_points(300, 8);
        let delaunay = Delaunay::new(points.clone()).unwrap();
        let index = delaunay.spatial_index();
        let mut rng = ChaCha8Rng::seed_from_u64(80);
        for _ in 0..200 {
            let target = DVec2::new(rng.gen_range(0.0..500.0), rng.gen_range(0.0..500.0));
            let walked = delaunay.locate(target.x, target.y, 0).unwrap();
            let indexed = index.find_nearest(target);
            assert_eq!(
                target.distance_squared(points[walked]),
                target.distance_squared(points[indexed])
            );
        }
    }
}
