//! Geometric predicates used by the sweep
//!
//! All predicates work in screen coordinates (y axis pointing down), so a
//! triangle that "turns counter-clockwise" here has a negative cross product
//! in the usual y-up convention.

use glam::DVec2;

/// Whether `r` lies strictly to the left of the directed line `p -> q` on screen
/// (clockwise turn in y-up coordinates)
#[inline]
pub fn orient(p: DVec2, q: DVec2, r: DVec2) -> bool {
    (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y) < 0.0
}

/// Whether `p` lies strictly inside the circumcircle of triangle `(a, b, c)`
///
/// Expects `(a, b, c)` in mesh orientation. Only the sign of the determinant
/// is used, no division is performed.
#[inline]
pub fn in_circle(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    let d = a - p;
    let e = b - p;
    let f = c - p;

    let ap = d.length_squared();
    let bp = e.length_squared();
    let cp = f.length_squared();

    d.x * (e.y * cp - bp * f.y) - d.y * (e.x * cp - bp * f.x) + ap * (e.x * f.y - e.y * f.x) < 0.0
}

/// Offset from `a` to the circumcenter of `(a, b, c)`
#[inline]
fn circumdelta(a: DVec2, b: DVec2, c: DVec2) -> (DVec2, f64, f64, f64) {
    let d = b - a;
    let e = c - a;

    let bl = d.length_squared();
    let cl = e.length_squared();
    let det = d.perp_dot(e);

    let delta = DVec2::new(
        (e.y * bl - d.y * cl) * 0.5 / det,
        (d.x * cl - e.x * bl) * 0.5 / det,
    );
    (delta, bl, cl, det)
}

/// Squared circumradius of `(a, b, c)`, or infinity when the triangle is degenerate
pub fn circumradius2(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    let (delta, bl, cl, det) = circumdelta(a, b, c);
    let r = delta.length_squared();
    if bl != 0.0 && cl != 0.0 && det != 0.0 && r != 0.0 && r.is_finite() {
        r
    } else {
        f64::INFINITY
    }
}

/// Circumcenter of `(a, b, c)`
///
/// Non-finite for collinear input.
#[inline]
pub fn circumcenter(a: DVec2, b: DVec2, c: DVec2) -> DVec2 {
    a + circumdelta(a, b, c).0
}

/// Monotone substitute for `atan2` mapped onto `[0, 1]`
///
/// Cheap to evaluate and ordered the same way as the true angle, which is all
/// the edge hash needs.
#[inline]
pub fn pseudo_angle(d: DVec2) -> f64 {
    let p = d.x / (d.x.abs() + d.y.abs());
    if d.y > 0.0 {
        (3.0 - p) / 4.0
    } else {
        (1.0 + p) / 4.0
    }
}
