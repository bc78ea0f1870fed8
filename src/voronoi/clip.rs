//! Rectangle clipping primitives
//!
//! Region codes classify a point against the four half-planes of the bounds
//! (bit set when the point is outside). Edge codes classify a point against
//! the four boundary lines (bit set when the point lies exactly on one).

use glam::DVec2;

use crate::config::Bounds;

pub(crate) const LEFT: u8 = 0b0001;
pub(crate) const RIGHT: u8 = 0b0010;
pub(crate) const TOP: u8 = 0b0100;
pub(crate) const BOTTOM: u8 = 0b1000;
pub(crate) const TOP_LEFT: u8 = TOP | LEFT;
pub(crate) const TOP_RIGHT: u8 = TOP | RIGHT;
pub(crate) const BOTTOM_RIGHT: u8 = BOTTOM | RIGHT;
pub(crate) const BOTTOM_LEFT: u8 = BOTTOM | LEFT;

/// Outside-ness of `p`, zero when `p` is inside or on the bounds
#[inline]
pub(crate) fn region_code(bounds: &Bounds, p: DVec2) -> u8 {
    let horizontal = if p.x < bounds.xmin {
        LEFT
    } else if p.x > bounds.xmax {
        RIGHT
    } else {
        0
    };
    let vertical = if p.y < bounds.ymin {
        TOP
    } else if p.y > bounds.ymax {
        BOTTOM
    } else {
        0
    };
    horizontal | vertical
}

/// Boundary lines `p` lies on, zero for points off the boundary
#[inline]
pub(crate) fn edge_code(bounds: &Bounds, p: DVec2) -> u8 {
    let horizontal = if p.x == bounds.xmin {
        LEFT
    } else if p.x == bounds.xmax {
        RIGHT
    } else {
        0
    };
    let vertical = if p.y == bounds.ymin {
        TOP
    } else if p.y == bounds.ymax {
        BOTTOM
    } else {
        0
    };
    horizontal | vertical
}

/// Cohen-Sutherland clip of the segment `a`-`b`
///
/// Returns the visible part with its endpoints in the input order, or `None`
/// if the segment misses the bounds.
pub(crate) fn clip_segment(bounds: &Bounds, mut a: DVec2, mut b: DVec2) -> Option<(DVec2, DVec2)> {
    let mut ca = region_code(bounds, a);
    let mut cb = region_code(bounds, b);
    loop {
        if ca == 0 && cb == 0 {
            return Some((a, b));
        }
        if ca & cb != 0 {
            return None;
        }
        let c = if ca != 0 { ca } else { cb };
        let d = b - a;
        let p = if c & BOTTOM != 0 {
            DVec2::new(a.x + d.x * (bounds.ymax - a.y) / d.y, bounds.ymax)
        } else if c & TOP != 0 {
            DVec2::new(a.x + d.x * (bounds.ymin - a.y) / d.y, bounds.ymin)
        } else if c & RIGHT != 0 {
            DVec2::new(bounds.xmax, a.y + d.y * (bounds.xmax - a.x) / d.x)
        } else {
            DVec2::new(bounds.xmin, a.y + d.y * (bounds.xmin - a.x) / d.x)
        };
        if ca != 0 {
            a = p;
            ca = region_code(bounds, a);
        } else {
            b = p;
            cb = region_code(bounds, b);
        }
    }
}

/// Where the ray from `origin` along `direction` leaves the bounds
///
/// `None` when the origin is already on or past the boundary the ray heads
/// for, or when `direction` is zero.
pub(crate) fn project(bounds: &Bounds, origin: DVec2, direction: DVec2) -> Option<DVec2> {
    let mut t = f64::INFINITY;
    let mut hit = origin;

    if direction.y < 0.0 {
        if origin.y <= bounds.ymin {
            return None;
        }
        let c = (bounds.ymin - origin.y) / direction.y;
        if c < t {
            t = c;
            hit = DVec2::new(origin.x + c * direction.x, bounds.ymin);
        }
    } else if direction.y > 0.0 {
        if origin.y >= bounds.ymax {
            return None;
        }
        let c = (bounds.ymax - origin.y) / direction.y;
        if c < t {
            t = c;
            hit = DVec2::new(origin.x + c * direction.x, bounds.ymax);
        }
    }

    if direction.x > 0.0 {
        if origin.x >= bounds.xmax {
            return None;
        }
        let c = (bounds.xmax - origin.x) / direction.x;
        if c < t {
            t = c;
            hit = DVec2::new(bounds.xmax, origin.y + c * direction.y);
        }
    } else if direction.x < 0.0 {
        if origin.x <= bounds.xmin {
            return None;
        }
        let c = (bounds.xmin - origin.x) / direction.x;
        if c < t {
            t = c;
            hit = DVec2::new(bounds.xmin, origin.y + c * direction.y);
        }
    }

    if t.is_finite() {
        Some(hit)
    } else {
        None
    }
}
