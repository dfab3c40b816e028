use geo::Coord;
use std::fmt::Write;

use super::bounds::Bounds;
use super::simplify::simplify_ring;
use crate::domain::Polygon;

/// SVG path data for one polygon plus its canvas-space bounds
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPath {
    pub data: String,
    pub bounds: Bounds,
}

/// Convert a polygon into move/line/close path commands
///
/// `project` maps a (lon, lat) coordinate to the canvas and may reject a
/// point by returning `None`. Rejected or non-finite points are skipped
/// without dropping the rest of their ring; a ring needs two surviving points
/// to be drawn. Returns `None` when no ring was drawn.
pub fn build_path<F>(polygon: &Polygon, project: F) -> Option<BuiltPath>
where
    F: Fn(Coord<f64>) -> Option<Coord<f64>>,
{
    build_simplified_path(polygon, project, 0.0)
}

/// [`build_path`] with Ramer-Douglas-Peucker applied to each projected ring
pub fn build_simplified_path<F>(polygon: &Polygon, project: F, epsilon: f64) -> Option<BuiltPath>
where
    F: Fn(Coord<f64>) -> Option<Coord<f64>>,
{
    let mut data = String::new();
    let mut bounds = Bounds::EMPTY;

    for ring in &polygon.rings {
        let points: Vec<Coord<f64>> = ring
            .0
            .iter()
            .filter_map(|&c| project(c))
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();

        if points.len() < 2 {
            continue;
        }

        let points = simplify_ring(&points, epsilon);

        for (i, point) in points.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            let _ = write!(
                data,
                "{}{},{}",
                command,
                round_coord(point.x),
                round_coord(point.y)
            );
            bounds.include(*point);
        }
        data.push('Z');
    }

    if data.is_empty() {
        return None;
    }

    Some(BuiltPath { data, bounds })
}

/// Round to 2 decimals for compact output; trailing zeros are dropped
fn round_coord(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid printing "-0"
    if rounded == 0.0 { 0.0 } else { rounded }
}
