use crate::domain::ZoomProfile;
use crate::geometry::{Bounds, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Tolerance under which two view boxes are treated as the same
pub const VIEW_BOX_EPSILON: f64 = 0.01;

/// Deepest zoom a country can reach
pub const MAX_SCALE: f64 = 10.0;

/// Smallest share of the canvas a country is treated as occupying
const MIN_EXTENT_RATIO: f64 = 0.05;

/// Visible window into the fixed canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub const FULL: ViewBox = ViewBox {
        x: 0.0,
        y: 0.0,
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Every field within [`VIEW_BOX_EPSILON`] of `other`
    pub fn approx_eq(&self, other: &ViewBox) -> bool {
        (self.x - other.x).abs() < VIEW_BOX_EPSILON
            && (self.y - other.y).abs() < VIEW_BOX_EPSILON
            && (self.width - other.width).abs() < VIEW_BOX_EPSILON
            && (self.height - other.height).abs() < VIEW_BOX_EPSILON
    }

    /// Linear interpolation of all four fields
    pub fn lerp(&self, to: &ViewBox, t: f64) -> ViewBox {
        ViewBox {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            width: self.width + (to.width - self.width) * t,
            height: self.height + (to.height - self.height) * t,
        }
    }

    /// Value for an SVG `viewBox` attribute, e.g. `"0.00 0.00 960.00 620.00"`
    pub fn to_attribute(&self) -> String {
        format!(
            "{:.2} {:.2} {:.2} {:.2}",
            self.x, self.y, self.width, self.height
        )
    }

    /// Ratio of the full canvas width to this window's width
    pub fn zoom(&self) -> f64 {
        CANVAS_WIDTH / self.width
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::FULL
    }
}

/// View box that frames a country's canvas bounds
///
/// The result always lies inside the canvas, whatever the bounds (empty,
/// zero-area or non-finite bounds fall back to sensible sizes and the canvas
/// centre).
pub fn view_box_for_country(bounds: &Bounds, profile: &ZoomProfile) -> ViewBox {
    let width = finite_or(bounds.width(), 0.0).max(CANVAS_WIDTH * MIN_EXTENT_RATIO);
    let height = finite_or(bounds.height(), 0.0).max(CANVAS_HEIGHT * MIN_EXTENT_RATIO);

    let fit_scale = (CANVAS_WIDTH * profile.fit_ratio / (width * profile.padding))
        .min(CANVAS_HEIGHT * profile.fit_ratio / (height * profile.padding));

    let min_scale = profile.min_scale.max(1.0);
    let scale = finite_or(fit_scale, min_scale)
        .max(min_scale)
        .clamp(min_scale, MAX_SCALE.max(min_scale));

    let zoom_width = CANVAS_WIDTH / scale;
    let zoom_height = CANVAS_HEIGHT / scale;

    let center = bounds.center();
    let center_x = finite_or(center.x, CANVAS_WIDTH / 2.0);
    let center_y = finite_or(center.y, CANVAS_HEIGHT / 2.0);

    ViewBox {
        x: (center_x - zoom_width / 2.0).clamp(0.0, CANVAS_WIDTH - zoom_width),
        y: (center_y - zoom_height / 2.0).clamp(0.0, CANVAS_HEIGHT - zoom_height),
        width: zoom_width,
        height: zoom_height,
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::zoom_profile;

    fn assert_inside_canvas(vb: &ViewBox) {
        assert!(vb.width > 0.0 && vb.height > 0.0, "{vb:?}");
        assert!(vb.x >= 0.0, "{vb:?}");
        assert!(vb.y >= 0.0, "{vb:?}");
        assert!(vb.x + vb.width <= CANVAS_WIDTH + 1e-9, "{vb:?}");
        assert!(vb.y + vb.height <= CANVAS_HEIGHT + 1e-9, "{vb:?}");
    }

    #[test]
    fn test_attribute_format() {
        assert_eq!(ViewBox::FULL.to_attribute(), "0.00 0.00 960.00 620.00");
        assert_eq!(
            ViewBox::new(1.005, 2.5, 300.0, 193.75).to_attribute(),
            "1.00 2.50 300.00 193.75"
        );
    }

    #[test]
    fn test_approx_eq() {
        let a = ViewBox::new(10.0, 10.0, 100.0, 100.0);
        assert!(a.approx_eq(&ViewBox::new(10.005, 9.995, 100.0, 100.009)));
        assert!(!a.approx_eq(&ViewBox::new(10.02, 10.0, 100.0, 100.0)));
    }

    #[test]
    fn test_country_zoom_centered() {
        let bounds = Bounds::new(400.0, 250.0, 480.0, 310.0);
        let vb = view_box_for_country(&bounds, &ZoomProfile::default());

        // fit = min(960 / (80 * 1.22), 620 / (60 * 1.22))
        let expected_scale = (960.0_f64 / (80.0 * 1.22)).min(620.0 / (60.0 * 1.22));
        assert!((vb.zoom() - expected_scale).abs() < 1e-9);
        assert!((vb.x + vb.width / 2.0 - 440.0).abs() < 1e-9);
        assert!((vb.y + vb.height / 2.0 - 280.0).abs() < 1e-9);
        assert_inside_canvas(&vb);
    }

    #[test]
    fn test_large_country_never_zooms_out() {
        let bounds = Bounds::new(-100.0, -100.0, 2000.0, 900.0);
        let vb = view_box_for_country(&bounds, &ZoomProfile::default());
        assert_eq!(vb, ViewBox::FULL);
    }

    #[test]
    fn test_min_scale_floor() {
        let bounds = Bounds::new(0.0, 0.0, 960.0, 620.0);
        let vb = view_box_for_country(&bounds, &zoom_profile("Indonesia"));
        assert!((vb.zoom() - 1.35).abs() < 1e-9);
        assert_inside_canvas(&vb);
    }

    #[test]
    fn test_tiny_country_capped() {
        let bounds = Bounds::new(500.0, 400.0, 500.5, 400.5);
        let vb = view_box_for_country(&bounds, &ZoomProfile::default());
        assert!(vb.zoom() <= MAX_SCALE + 1e-9);
        // 5% floor: 48 x 31 px padded by 1.22
        let expected = (960.0_f64 / (48.0 * 1.22)).min(620.0 / (31.0 * 1.22)).min(MAX_SCALE);
        assert!((vb.zoom() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_always_inside_canvas() {
        let cases = [
            Bounds::new(0.0, 0.0, 0.0, 0.0),
            Bounds::new(960.0, 620.0, 960.0, 620.0),
            Bounds::new(-50.0, -50.0, -40.0, -40.0),
            Bounds::new(950.0, 10.0, 1200.0, 20.0),
            Bounds::new(10.0, 600.0, 30.0, 900.0),
            Bounds::new(100.0, 100.0, 100.0, 500.0),
            Bounds::EMPTY,
            Bounds::new(f64::NAN, 0.0, 10.0, 10.0),
        ];
        let profiles = [
            ZoomProfile::default(),
            zoom_profile("Indonesia"),
            zoom_profile("Vietnam"),
        ];

        for bounds in &cases {
            for profile in &profiles {
                assert_inside_canvas(&view_box_for_country(bounds, profile));
            }
        }
    }

    #[test]
    fn test_lerp() {
        let from = ViewBox::FULL;
        let to = ViewBox::new(100.0, 50.0, 480.0, 310.0);
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, 1.0), to);
        assert_eq!(from.lerp(&to, 0.5), ViewBox::new(50.0, 25.0, 720.0, 465.0));
    }
}
