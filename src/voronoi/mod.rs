//! Voronoi diagram clipped to a rectangle
//!
//! The diagram is the dual of a [`Delaunay`] mesh: one vertex per triangle
//! (its circumcenter) and one cell per site. Cells of hull sites are
//! unbounded; they are closed by projecting along per-site exterior rays and
//! clipping against the [`Bounds`], with rectangle corners spliced in where
//! the clipped boundary turns a corner.

mod clip;

use glam::DVec2;
use tracing::{debug, trace};

use crate::cell::VoronoiCell;
use crate::config::Bounds;
use crate::delaunay::Delaunay;
use crate::error::Result;
use crate::path::{PathSink, Polygon};
use crate::triangulation::{circumcenter, next_halfedge, triangle_of_edge, EMPTY};

use clip::{
    clip_segment, edge_code, project, region_code, BOTTOM, BOTTOM_LEFT, BOTTOM_RIGHT, LEFT, RIGHT,
    TOP, TOP_LEFT, TOP_RIGHT,
};

/// Voronoi diagram of a [`Delaunay`] mesh within a bounding rectangle
///
/// # Example
///
/// ```rust
/// use rust_planar_voronoi::{Bounds, Delaunay};
///
/// let delaunay = Delaunay::from_coords(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0]).unwrap();
/// let voronoi = delaunay.voronoi(Bounds::new(0.0, 0.0, 10.0, 10.0).unwrap()).unwrap();
///
/// // each corner site owns one quadrant
/// let cell = voronoi.cell_polygon(0).unwrap();
/// assert_eq!(cell.first(), cell.last());
/// assert!(voronoi.contains(0, 1.0, 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Voronoi {
    delaunay: Delaunay,
    bounds: Bounds,
    circumcenters: Vec<DVec2>,
    rays: Vec<[DVec2; 2]>,
}

impl Voronoi {
    /// Build the diagram of `delaunay` clipped to `bounds`
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` if `bounds` is inverted or not a number.
    pub fn new(delaunay: Delaunay, bounds: Bounds) -> Result<Self> {
        bounds.validate()?;

        let points = delaunay.points();
        let circumcenters: Vec<DVec2> = delaunay
            .triangles()
            .chunks_exact(3)
            .map(|t| circumcenter(points[t[0]], points[t[1]], points[t[2]]))
            .collect();

        // incoming ray in slot 0, outgoing in slot 1
        let mut rays = vec![[DVec2::ZERO; 2]; points.len()];
        let hull = delaunay.hull();
        let mut id = hull.start();
        loop {
            let next = hull.next(id);
            let (p0, p1) = (hull.point(id), hull.point(next));
            let v = DVec2::new(p0.y - p1.y, p1.x - p0.x);
            rays[hull.index(id)][1] = v;
            rays[hull.index(next)][0] = v;
            id = next;
            if id == hull.start() {
                break;
            }
        }

        debug!(
            sites = points.len(),
            vertices = circumcenters.len(),
            unbounded = hull.len(),
            width = bounds.width(),
            height = bounds.height(),
            "voronoi diagram built"
        );

        Ok(Self {
            delaunay,
            bounds,
            circumcenters,
            rays,
        })
    }

    #[inline]
    pub fn delaunay(&self) -> &Delaunay {
        &self.delaunay
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Circumcenter of each Delaunay triangle, in triangle order
    #[inline]
    pub fn circumcenters(&self) -> &[DVec2] {
        &self.circumcenters
    }

    /// Exterior ray directions per site, `[incoming, outgoing]`
    ///
    /// Both are zero for interior sites.
    #[inline]
    pub fn rays(&self) -> &[[DVec2; 2]] {
        &self.rays
    }

    /// Whether `(x, y)` is at least as close to site `i` as to any of its
    /// neighbors
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a site index.
    pub fn contains(&self, i: usize, x: f64, y: f64) -> bool {
        assert!(
            i < self.delaunay.len(),
            "site {} out of range ({} sites)",
            i,
            self.delaunay.len()
        );
        self.contains_point(i, DVec2::new(x, y))
    }

    #[inline]
    fn contains_point(&self, i: usize, p: DVec2) -> bool {
        self.delaunay.step(i, p) == Some(i)
    }

    /// Draw every Voronoi edge clipped to the bounds
    ///
    /// Interior edges join the circumcenters of adjacent triangles. Each hull
    /// site adds the ray leaving its outgoing hull edge.
    pub fn render<S: PathSink>(&self, sink: &mut S) {
        for (e, &opposite) in self.delaunay.halfedges().iter().enumerate() {
            if opposite == EMPTY || opposite < e {
                continue;
            }
            let a = self.circumcenters[triangle_of_edge(e)];
            let b = self.circumcenters[triangle_of_edge(opposite)];
            self.render_segment(a, b, sink);
        }

        let hull = self.delaunay.hull();
        for node in hull.iter() {
            let origin = self.circumcenters[triangle_of_edge(node.halfedge)];
            let direction = self.rays[node.index][1];
            if let Some(end) = project(&self.bounds, origin, direction) {
                self.render_segment(origin, end, sink);
            }
        }
    }

    /// Draw the bounding rectangle
    pub fn render_bounds<S: PathSink>(&self, sink: &mut S) {
        let b = &self.bounds;
        sink.rect(b.xmin, b.ymin, b.width(), b.height());
    }

    /// Draw the clipped cell of site `i` as one closed subpath
    ///
    /// Returns `false` and draws nothing when the site has no cell, either
    /// because it is coincident or because its cell lies outside the bounds.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a site index.
    pub fn render_cell<S: PathSink>(&self, i: usize, sink: &mut S) -> bool {
        let vertices = match self.clip(i) {
            Some(vertices) if !vertices.is_empty() => vertices,
            _ => return false,
        };
        sink.move_to(vertices[0].x, vertices[0].y);
        for v in &vertices[1..] {
            sink.line_to(v.x, v.y);
        }
        sink.close_path();
        true
    }

    /// Closed vertex ring of the clipped cell of site `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a site index.
    pub fn cell_polygon(&self, i: usize) -> Option<Vec<DVec2>> {
        let mut polygon = Polygon::new();
        if self.render_cell(i, &mut polygon) {
            polygon.into_value()
        } else {
            None
        }
    }

    /// [`Voronoi::cell_polygon`] for every site, in site order
    pub fn cell_polygons(&self) -> impl Iterator<Item = Option<Vec<DVec2>>> + '_ {
        (0..self.delaunay.len()).map(move |i| self.cell_polygon(i))
    }

    /// Owned cell records for every site that has a cell
    ///
    /// Vertices form an open ring (the first vertex is not repeated).
    pub fn cells(&self) -> Vec<VoronoiCell> {
        (0..self.delaunay.len())
            .filter_map(|i| {
                let vertices = self.clip(i)?;
                Some(VoronoiCell::new(
                    i,
                    self.delaunay.point(i),
                    self.delaunay.neighbors(i).collect(),
                    vertices,
                ))
            })
            .collect()
    }

    fn render_segment<S: PathSink>(&self, a: DVec2, b: DVec2, sink: &mut S) {
        let clipped = if region_code(&self.bounds, a) == 0 && region_code(&self.bounds, b) == 0 {
            Some((a, b))
        } else {
            clip_segment(&self.bounds, a, b)
        };
        if let Some((a, b)) = clipped {
            sink.move_to(a.x, a.y);
            sink.line_to(b.x, b.y);
        }
    }

    /// Circumcenters around site `i`, unclipped
    fn cell(&self, i: usize) -> Option<Vec<DVec2>> {
        let e0 = self.delaunay.inedges()[i];
        if e0 == EMPTY {
            return None;
        }
        let triangles = self.delaunay.triangles();
        let halfedges = self.delaunay.halfedges();
        let mut vertices = Vec::new();
        let mut e = e0;
        loop {
            vertices.push(self.circumcenters[triangle_of_edge(e)]);
            e = next_halfedge(e);
            if triangles[e] != i {
                trace!(site = i, edge = e, "inconsistent triangulation, cell truncated");
                break;
            }
            e = halfedges[e];
            if e == e0 || e == EMPTY {
                break;
            }
        }
        Some(vertices)
    }

    fn clip(&self, i: usize) -> Option<Vec<DVec2>> {
        let points = self.cell(i)?;
        let [incoming, outgoing] = self.rays[i];
        if incoming != DVec2::ZERO {
            self.clip_infinite(i, points, incoming, outgoing)
        } else {
            self.clip_finite(i, &points)
        }
    }

    /// Clip a closed ring against the bounds
    fn clip_finite(&self, i: usize, points: &[DVec2]) -> Option<Vec<DVec2>> {
        let bounds = &self.bounds;
        let mut out: Vec<DVec2> = Vec::new();
        let mut p1 = *points.last()?;
        let mut c1 = region_code(bounds, p1);
        let mut e1 = 0;

        for &p in points {
            let p0 = p1;
            let c0 = c1;
            p1 = p;
            c1 = region_code(bounds, p1);

            if c0 == 0 && c1 == 0 {
                e1 = 0;
                out.push(p1);
                continue;
            }

            let exit = if c0 == 0 {
                match clip_segment(bounds, p0, p1) {
                    Some((_, exit)) => exit,
                    None => continue,
                }
            } else {
                let (exit, entry) = match clip_segment(bounds, p1, p0) {
                    Some(segment) => segment,
                    None => continue,
                };
                let e0 = e1;
                e1 = edge_code(bounds, entry);
                if e0 != 0 && e1 != 0 {
                    let j = out.len();
                    self.splice_corners(i, e0, e1, &mut out, j);
                }
                out.push(entry);
                exit
            };

            let e0 = e1;
            e1 = edge_code(bounds, exit);
            if e0 != 0 && e1 != 0 {
                let j = out.len();
                self.splice_corners(i, e0, e1, &mut out, j);
            }
            out.push(exit);
        }

        if let Some(&first) = out.first() {
            let e0 = e1;
            let e1 = edge_code(bounds, first);
            if e0 != 0 && e1 != 0 {
                let j = out.len();
                self.splice_corners(i, e0, e1, &mut out, j);
            }
            Some(out)
        } else if self.contains_point(i, bounds.center()) {
            Some(vec![
                DVec2::new(bounds.xmax, bounds.ymin),
                DVec2::new(bounds.xmax, bounds.ymax),
                DVec2::new(bounds.xmin, bounds.ymax),
                DVec2::new(bounds.xmin, bounds.ymin),
            ])
        } else {
            None
        }
    }

    /// Close an unbounded cell along its rays, then clip it
    fn clip_infinite(
        &self,
        i: usize,
        mut points: Vec<DVec2>,
        incoming: DVec2,
        outgoing: DVec2,
    ) -> Option<Vec<DVec2>> {
        let bounds = &self.bounds;
        if let Some(p) = points.first().and_then(|&p| project(bounds, p, incoming)) {
            points.insert(0, p);
        }
        if let Some(p) = points.last().and_then(|&p| project(bounds, p, outgoing)) {
            points.push(p);
        }

        match self.clip_finite(i, &points) {
            Some(mut out) => {
                let mut c1 = out.last().map_or(0, |&p| edge_code(bounds, p));
                let mut j = 0;
                while j < out.len() {
                    let c0 = c1;
                    c1 = edge_code(bounds, out[j]);
                    if c0 != 0 && c1 != 0 {
                        j = self.splice_corners(i, c0, c1, &mut out, j);
                    }
                    j += 1;
                }
                Some(out)
            }
            None if self.contains_point(i, bounds.center()) => Some(bounds.corners().to_vec()),
            None => None,
        }
    }

    /// Insert the rectangle corners met when walking the boundary from edge
    /// `e0` to edge `e1`, keeping those that belong to site `i`
    ///
    /// Corners go in at `j`; returns the position after the last insertion.
    fn splice_corners(&self, i: usize, mut e0: u8, e1: u8, out: &mut Vec<DVec2>, mut j: usize) -> usize {
        let b = &self.bounds;
        while e0 != e1 {
            let corner = match e0 {
                TOP_LEFT => {
                    e0 = TOP;
                    continue;
                }
                TOP => {
                    e0 = TOP_RIGHT;
                    DVec2::new(b.xmax, b.ymin)
                }
                TOP_RIGHT => {
                    e0 = RIGHT;
                    continue;
                }
                RIGHT => {
                    e0 = BOTTOM_RIGHT;
                    DVec2::new(b.xmax, b.ymax)
                }
                BOTTOM_RIGHT => {
                    e0 = BOTTOM;
                    continue;
                }
                BOTTOM => {
                    e0 = BOTTOM_LEFT;
                    DVec2::new(b.xmin, b.ymax)
                }
                BOTTOM_LEFT => {
                    e0 = LEFT;
                    continue;
                }
                LEFT => {
                    e0 = TOP_LEFT;
                    DVec2::new(b.xmin, b.ymin)
                }
                _ => return j,
            };
            if out.get(j) != Some(&corner) && self.contains_point(i, corner) {
                out.insert(j, corner);
                j += 1;
            }
        }
        j
    }
}
