use geo::{Coord, coord};

use super::projection::{MAX_LATITUDE, project};
use crate::domain::Feature;

/// Axis-aligned bounding box in projected or canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Sentinel before any point is folded in; identity for [`Bounds::merge`]
    pub const EMPTY: Bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create bounds from a set of points, `None` if no point is finite
    pub fn from_points(points: &[Coord<f64>]) -> Option<Self> {
        let mut bounds = Self::EMPTY;
        for &point in points {
            bounds.include(point);
        }
        (!bounds.is_empty()).then_some(bounds)
    }

    /// Fold a point in; non-finite points are ignored
    pub fn include(&mut self, point: Coord<f64>) {
        if !point.x.is_finite() || !point.y.is_finite() {
            return;
        }
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn is_empty(&self) -> bool {
        !(self.min_x <= self.max_x && self.min_y <= self.max_y)
    }

    /// Component-wise union
    pub fn merge(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Scale width and height by `factor` around the centre.
    ///
    /// Only grows: `factor <= 1` returns the bounds unchanged.
    pub fn expand(&self, factor: f64) -> Bounds {
        if factor <= 1.0 || !factor.is_finite() || self.is_empty() {
            return *self;
        }
        let pad_x = self.width() * (factor - 1.0) / 2.0;
        let pad_y = self.height() * (factor - 1.0) / 2.0;
        Bounds {
            min_x: self.min_x - pad_x,
            min_y: self.min_y - pad_y,
            max_x: self.max_x + pad_x,
            max_y: self.max_y + pad_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Coord<f64> {
        coord! {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Projected bounds of the whole clamped world (lon +-180, lat +-85)
pub fn world_bounds() -> Bounds {
    let south_west = project(coord! { x: -180.0, y: -MAX_LATITUDE });
    let north_east = project(coord! { x: 180.0, y: MAX_LATITUDE });
    Bounds::new(south_west.x, south_west.y, north_east.x, north_east.y)
}

/// Projected bounds over every coordinate of every feature
///
/// Falls back to [`world_bounds`] when nothing finite was found, so callers
/// never scale by an infinite or zero extent.
pub fn collect_bounds<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Bounds {
    let mut bounds = Bounds::EMPTY;
    for feature in features {
        for polygon in feature.geometry.polygons() {
            for point in polygon.coords() {
                bounds.include(project(point));
            }
        }
    }

    if bounds.is_empty() {
        world_bounds()
    } else {
        bounds
    }
}
