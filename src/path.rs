//! Path output for triangles, hulls and cells
//!
//! Rendering methods on [`Delaunay`](crate::Delaunay) and
//! [`Voronoi`](crate::Voronoi) write into any [`PathSink`]. Two sinks are
//! provided: [`SvgPath`] builds SVG path data and [`Polygon`] collects the
//! vertices of a single ring.

use glam::DVec2;

/// Number of chords used when a sink without native arcs draws a circle
pub const ARC_SEGMENTS: usize = 32;

/// Minimal drawing surface
pub trait PathSink {
    /// Start a new subpath at `(x, y)`
    fn move_to(&mut self, x: f64, y: f64);

    /// Straight segment from the current point to `(x, y)`
    fn line_to(&mut self, x: f64, y: f64);

    /// Close the current subpath back to its start
    fn close_path(&mut self);

    /// Full circle of radius `r` around `(x, y)`
    ///
    /// The default draws [`ARC_SEGMENTS`] chords, starting at `(x + r, y)`.
    fn arc(&mut self, x: f64, y: f64, r: f64) {
        self.move_to(x + r, y);
        for k in 1..ARC_SEGMENTS {
            let theta = k as f64 * std::f64::consts::TAU / ARC_SEGMENTS as f64;
            self.line_to(x + r * theta.cos(), y + r * theta.sin());
        }
        self.close_path();
    }

    /// Axis-aligned rectangle with top-left corner `(x, y)`
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close_path();
    }
}

/// Distance below which an arc start is treated as the current point
const ARC_EPSILON: f64 = 1e-6;

/// SVG path data builder
///
/// # Example
///
/// ```rust
/// use rust_planar_voronoi::path::{PathSink, SvgPath};
///
/// let mut path = SvgPath::new();
/// path.move_to(0.0, 0.0);
/// path.line_to(10.0, 0.5);
/// path.close_path();
/// assert_eq!(path.value(), Some("M0,0L10,0.5Z"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SvgPath {
    data: String,
    start: Option<DVec2>,
    current: Option<DVec2>,
}

impl SvgPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path data, or `None` if nothing was drawn
    pub fn value(&self) -> Option<&str> {
        if self.data.is_empty() {
            None
        } else {
            Some(&self.data)
        }
    }

    pub fn into_value(self) -> Option<String> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.data)
        }
    }
}

impl PathSink for SvgPath {
    fn move_to(&mut self, x: f64, y: f64) {
        let p = DVec2::new(x, y);
        self.start = Some(p);
        self.current = Some(p);
        self.data.push_str(&format!("M{},{}", x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.current = Some(DVec2::new(x, y));
        self.data.push_str(&format!("L{},{}", x, y));
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            self.current = self.start;
            self.data.push('Z');
        }
    }

    /// # Panics
    ///
    /// Panics if `r` is negative.
    fn arc(&mut self, x: f64, y: f64, r: f64) {
        assert!(r >= 0.0, "negative radius: {}", r);
        let start = DVec2::new(x + r, y);
        match self.current {
            None => {
                self.data.push_str(&format!("M{},{}", start.x, start.y));
            }
            Some(current) if (current - start).abs().max_element() > ARC_EPSILON => {
                self.data.push_str(&format!("L{},{}", start.x, start.y));
            }
            Some(_) => {}
        }
        if r == 0.0 {
            return;
        }
        self.current = Some(start);
        self.data.push_str(&format!(
            "A{r},{r},0,1,1,{},{}A{r},{r},0,1,1,{},{}",
            x - r,
            y,
            start.x,
            start.y,
            r = r
        ));
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let p = DVec2::new(x, y);
        self.start = Some(p);
        self.current = Some(p);
        self.data.push_str(&format!("M{},{}h{}v{}h{}Z", x, y, w, h, -w));
    }
}

/// Collects the vertices of one ring
///
/// `close_path` repeats the first vertex at the end, so a finished polygon
/// is closed.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// The collected ring, or `None` if nothing was drawn
    pub fn into_value(self) -> Option<Vec<DVec2>> {
        if self.vertices.is_empty() {
            None
        } else {
            Some(self.vertices)
        }
    }
}

impl PathSink for Polygon {
    fn move_to(&mut self, x: f64, y: f64) {
        self.vertices.push(DVec2::new(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.vertices.push(DVec2::new(x, y));
    }

    fn close_path(&mut self) {
        if let Some(&first) = self.vertices.first() {
            self.vertices.push(first);
        }
    }

    /// Chords as in the default, without repeating a start vertex that was
    /// just moved to
    fn arc(&mut self, x: f64, y: f64, r: f64) {
        let start = DVec2::new(x + r, y);
        if self.vertices.last() != Some(&start) {
            self.vertices.push(start);
        }
        for k in 1..ARC_SEGMENTS {
            let theta = k as f64 * std::f64::consts::TAU / ARC_SEGMENTS as f64;
            self.vertices.push(DVec2::new(x + r * theta.cos(), y + r * theta.sin()));
        }
        self.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_empty() {
        assert_eq!(SvgPath::new().value(), None);
        assert_eq!(SvgPath::new().into_value(), None);
    }

    #[test]
    fn test_svg_rect() {
        let mut path = SvgPath::new();
        path.rect(1.0, 2.0, 3.0, 4.0);
        assert_eq!(path.value(), Some("M1,2h3v4h-3Z"));
    }

    #[test]
    fn test_svg_arc_moves_to_start() {
        let mut path = SvgPath::new();
        path.arc(5.0, 5.0, 2.0);
        assert_eq!(
            path.value(),
            Some("M7,5A2,2,0,1,1,3,5A2,2,0,1,1,7,5")
        );
    }

    #[test]
    fn test_svg_arc_after_move_to_same_point() {
        let mut path = SvgPath::new();
        path.move_to(7.0, 5.0);
        path.arc(5.0, 5.0, 2.0);
        assert_eq!(
            path.value(),
            Some("M7,5A2,2,0,1,1,3,5A2,2,0,1,1,7,5")
        );
    }

    #[test]
    #[should_panic(expected = "negative radius")]
    fn test_svg_negative_radius() {
        SvgPath::new().arc(0.0, 0.0, -1.0);
    }

    #[test]
    fn test_close_path_without_current_point() {
        let mut path = SvgPath::new();
        path.close_path();
        assert_eq!(path.value(), None);
    }

    #[test]
    fn test_polygon_closes_ring() {
        let mut polygon = Polygon::new();
        polygon.move_to(0.0, 0.0);
        polygon.line_to(1.0, 0.0);
        polygon.line_to(1.0, 1.0);
        polygon.close_path();
        let ring = polygon.into_value().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_polygon_default_rect_and_arc() {
        let mut polygon = Polygon::new();
        polygon.rect(0.0, 0.0, 2.0, 1.0);
        assert_eq!(
            polygon.vertices(),
            &[
                DVec2::new(0.0, 0.0),
                DVec2::new(2.0, 0.0),
                DVec2::new(2.0, 1.0),
                DVec2::new(0.0, 1.0),
                DVec2::new(0.0, 0.0),
            ]
        );

        let mut circle = Polygon::new();
        circle.arc(0.0, 0.0, 3.0);
        assert_eq!(circle.vertices().len(), ARC_SEGMENTS + 1);
        for v in circle.vertices() {
            assert!((v.length() - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_polygon_arc_after_move_to_keeps_one_start() {
        let mut circle = Polygon::new();
        circle.move_to(5.0, 1.0);
        circle.arc(3.0, 1.0, 2.0);
        let ring = circle.into_value().unwrap();
        assert_eq!(ring.len(), ARC_SEGMENTS + 1);
        assert_eq!(ring[0], DVec2::new(5.0, 1.0));
        assert_ne!(ring[1], ring[0]);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_empty_polygon_is_absent() {
        let mut polygon = Polygon::new();
        polygon.close_path();
        assert!(polygon.into_value().is_none());
    }
}
