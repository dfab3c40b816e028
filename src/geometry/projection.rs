use geo::Coord;
use std::f64::consts::FRAC_PI_4;

/// Latitude limit applied before projecting; the Mercator y diverges at the poles.
pub const MAX_LATITUDE: f64 = 85.0;

/// Spherical Mercator projection from (lon, lat) degrees to a unitless plane
///
/// - x = lon in radians
/// - y = ln(tan(pi/4 + lat/2)) with lat clamped to +-85 degrees
///
/// Independent of screen size; the canvas fit happens in [`super::CanvasProjector`].
pub fn project(coord: Coord<f64>) -> Coord<f64> {
    let x = coord.x.to_radians();
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let y = (FRAC_PI_4 + lat / 2.0).tan().ln();

    Coord { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_project_origin() {
        let p = project(coord! { x: 0.0, y: 0.0 });
        assert!(p.x.abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn test_project_clamps_poles() {
        let pole = project(coord! { x: 10.0, y: 90.0 });
        let limit = project(coord! { x: 10.0, y: MAX_LATITUDE });
        assert!(pole.y.is_finite());
        assert_eq!(pole.y, limit.y);

        let south = project(coord! { x: 10.0, y: -90.0 });
        assert!((south.y + limit.y).abs() < 1e-12);
    }

    #[test]
    fn test_project_monotonic() {
        let mut prev_x = f64::NEG_INFINITY;
        for lon in (-180..=180).step_by(15) {
            let p = project(coord! { x: lon as f64, y: 12.0 });
            assert!(p.x > prev_x);
            prev_x = p.x;
        }

        let mut prev_y = f64::NEG_INFINITY;
        for lat in (-85..=85).step_by(5) {
            let p = project(coord! { x: 100.0, y: lat as f64 });
            assert!(p.y > prev_y, "y not increasing at lat {lat}");
            prev_y = p.y;
        }
    }

    #[test]
    fn test_project_x_is_radians() {
        let p = project(coord! { x: 180.0, y: 0.0 });
        assert!((p.x - std::f64::consts::PI).abs() < 1e-12);
    }
}
