use geo::{Coord, LineString, Simplify};

/// Ramer-Douglas-Peucker over a canvas-space ring
///
/// Short rings and rings that would collapse below three distinct points
/// come back unchanged. A non-positive `epsilon` disables simplification.
pub fn simplify_ring(points: &[Coord<f64>], epsilon: f64) -> Vec<Coord<f64>> {
    if epsilon <= 0.0 || points.len() < 4 {
        return points.to_vec();
    }

    let line = LineString::from(points.to_vec());
    let simplified = line.simplify(&epsilon);

    if !has_distinct_points(&simplified.0, 3) {
        return points.to_vec();
    }

    simplified.0
}

/// True when `points` holds at least `count` pairwise distinct points
fn has_distinct_points(points: &[Coord<f64>], count: usize) -> bool {
    let mut seen: Vec<Coord<f64>> = Vec::with_capacity(count);
    for point in points {
        if !seen.contains(point) {
            seen.push(*point);
            if seen.len() >= count {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_simplify_short_ring_untouched() {
        let points = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
            coord! { x: 2.0, y: 2.0 },
        ];
        assert_eq!(simplify_ring(&points, 1.0), points);
    }

    #[test]
    fn test_simplify_reduces_points() {
        let mut points: Vec<Coord<f64>> = (0..100)
            .map(|i| coord! { x: i as f64, y: if i % 2 == 0 { 0.0 } else { 0.01 } })
            .collect();
        points.push(coord! { x: 99.0, y: 50.0 });

        let result = simplify_ring(&points, 0.1);
        assert!(result.len() < points.len());
        assert!(has_distinct_points(&result, 3));
    }

    #[test]
    fn test_simplify_disabled() {
        let points: Vec<Coord<f64>> = (0..10).map(|i| coord! { x: i as f64, y: 0.0 }).collect();
        assert_eq!(simplify_ring(&points, 0.0), points);
    }

    #[test]
    fn test_closed_ring_never_collapses() {
        // first point repeated at the end, as GeoJSON rings are written
        let points = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.3, y: 0.0 },
            coord! { x: 0.3, y: 0.3 },
            coord! { x: 0.0, y: 0.3 },
            coord! { x: 0.0, y: 0.0 },
        ];
        assert_eq!(simplify_ring(&points, 5.0), points);
    }

    #[test]
    fn test_distinct_point_count() {
        let a = coord! { x: 1.0, y: 1.0 };
        let b = coord! { x: 2.0, y: 1.0 };
        let c = coord! { x: 2.0, y: 2.0 };
        assert!(!has_distinct_points(&[a, a], 3));
        assert!(!has_distinct_points(&[a, b, a, b], 3));
        assert!(has_distinct_points(&[a, b, a, c], 3));
    }
}
