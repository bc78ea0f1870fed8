//! Diagram configuration: clipping bounds and point coordinate extraction
//!
//! This module provides the two inputs the engine needs besides the raw sites:
//! the rectangle Voronoi cells are clipped to, and the functions that pull
//! `x`/`y` out of caller-defined point records.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// Axis-aligned clipping rectangle for Voronoi cells
///
/// Coordinates follow screen conventions: `ymin` is the top edge and `ymax`
/// the bottom edge. A rectangle of zero width or height is accepted; only
/// inverted (or NaN) extents are rejected.
///
/// # Example
///
/// ```rust
/// use rust_planar_voronoi::Bounds;
///
/// let bounds = Bounds::new(0.0, 0.0, 100.0, 50.0).unwrap();
/// assert_eq!(bounds.width(), 100.0);
/// assert!(Bounds::new(10.0, 0.0, 0.0, 10.0).is_err());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge
    pub xmin: f64,
    /// Top edge
    pub ymin: f64,
    /// Right edge
    pub xmax: f64,
    /// Bottom edge
    pub ymax: f64,
}

impl Bounds {
    /// Create validated bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` if `xmax < xmin`, `ymax < ymin`, or any
    /// coordinate is NaN.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self> {
        let bounds = Self {
            xmin,
            ymin,
            xmax,
            ymax,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Check the extents, e.g. after deserializing or mutating the public fields
    pub fn validate(&self) -> Result<()> {
        // Written as negations so that NaN fails too.
        if !(self.xmax >= self.xmin) || !(self.ymax >= self.ymin) {
            return Err(VoronoiError::InvalidBounds {
                xmin: self.xmin,
                ymin: self.ymin,
                xmax: self.xmax,
                ymax: self.ymax,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center of the rectangle
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
        )
    }

    /// Whether `point` lies inside the rectangle or on its boundary
    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.xmin && point.x <= self.xmax && point.y >= self.ymin && point.y <= self.ymax
    }

    /// The four corners, clockwise on screen starting at the top-left
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.xmin, self.ymin),
            DVec2::new(self.xmax, self.ymin),
            DVec2::new(self.xmax, self.ymax),
            DVec2::new(self.xmin, self.ymax),
        ]
    }
}

impl Default for Bounds {
    /// A 960 x 500 canvas anchored at the origin
    fn default() -> Self {
        Self {
            xmin: 0.0,
            ymin: 0.0,
            xmax: 960.0,
            ymax: 500.0,
        }
    }
}

/// Coordinate extraction for caller-defined point records
///
/// Lets a triangulation be built straight from application data without
/// first copying it into `DVec2`s.
///
/// # Example
///
/// ```rust
/// use rust_planar_voronoi::{Delaunay, PointAccessor};
///
/// struct City { lon: f64, lat: f64 }
///
/// let cities = vec![
///     City { lon: 0.0, lat: 0.0 },
///     City { lon: 4.0, lat: 0.0 },
///     City { lon: 0.0, lat: 3.0 },
/// ];
/// let accessor = PointAccessor::new(|c: &City| c.lon, |c: &City| c.lat);
/// let delaunay = Delaunay::from_points(&cities, &accessor).unwrap();
/// assert_eq!(delaunay.triangle_count(), 1);
/// ```
pub struct PointAccessor<P> {
    /// Extracts the `x` coordinate
    pub x: fn(&P) -> f64,
    /// Extracts the `y` coordinate
    pub y: fn(&P) -> f64,
}

impl<P> PointAccessor<P> {
    pub fn new(x: fn(&P) -> f64, y: fn(&P) -> f64) -> Self {
        Self { x, y }
    }

    /// Extract both coordinates of `point`
    #[inline]
    pub fn get(&self, point: &P) -> DVec2 {
        DVec2::new((self.x)(point), (self.y)(point))
    }
}

impl<P> Clone for PointAccessor<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PointAccessor<P> {}

impl<P> std::fmt::Debug for PointAccessor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointAccessor").finish_non_exhaustive()
    }
}

impl Default for PointAccessor<[f64; 2]> {
    fn default() -> Self {
        Self::new(|p| p[0], |p| p[1])
    }
}

impl Default for PointAccessor<(f64, f64)> {
    fn default() -> Self {
        Self::new(|p| p.0, |p| p.1)
    }
}

impl Default for PointAccessor<DVec2> {
    fn default() -> Self {
        Self::new(|p| p.x, |p| p.y)
    }
}
