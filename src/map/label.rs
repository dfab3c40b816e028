use crate::domain::EditorialLabelSpec;
use crate::geometry::Bounds;

use super::viewbox::ViewBox;

/// Height share the anchor is lifted by for most countries
const LIFT_RATIO: f64 = 0.16;
/// Height share for tall countries, whose visual mass sits lower
const TALL_LIFT_RATIO: f64 = 0.20;
const TALL_ASPECT: f64 = 1.12;
const WIDE_ASPECT: f64 = 1.15;
const WIDE_SHIFT_RATIO: f64 = 0.04;

/// Band of the stage (percent) the label anchor is kept within
const LEFT_RANGE: (f64, f64) = (14.0, 86.0);
const TOP_RANGE: (f64, f64) = (10.0, 76.0);

/// Label anchor as a percentage of the current view box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub left_pct: f64,
    pub top_pct: f64,
}

impl LabelPlacement {
    /// Anchor position in canvas units for the given view box
    pub fn to_canvas(&self, view_box: &ViewBox) -> (f64, f64) {
        (
            view_box.x + view_box.width * self.left_pct / 100.0,
            view_box.y + view_box.height * self.top_pct / 100.0,
        )
    }
}

/// Place a country's editorial label over the current view box
///
/// Starts from the centre of the country's bounds, lifts it clear of the
/// shape, applies the country's own nudges (scaled by the view box so they
/// stay the same on screen at any zoom) and clamps into the safe band.
pub fn place_label(bounds: &Bounds, spec: &EditorialLabelSpec, view_box: &ViewBox) -> LabelPlacement {
    let width = bounds.width();
    let height = bounds.height();
    let center = bounds.center();

    let tall = height > width * TALL_ASPECT;
    let wide = width > height * WIDE_ASPECT;

    let lift = if tall { TALL_LIFT_RATIO } else { LIFT_RATIO };
    let mut anchor_x = center.x;
    let mut anchor_y = center.y - height * lift;
    if wide {
        anchor_x -= width * WIDE_SHIFT_RATIO;
    }

    anchor_x += spec.nudge_x * view_box.width;
    anchor_y += spec.nudge_y * view_box.height;

    let left = (anchor_x - view_box.x) / view_box.width * 100.0;
    let top = (anchor_y - view_box.y) / view_box.height * 100.0;

    LabelPlacement {
        left_pct: clamp_pct(left, LEFT_RANGE),
        top_pct: clamp_pct(top, TOP_RANGE),
    }
}

fn clamp_pct(value: f64, (low, high): (f64, f64)) -> f64 {
    if value.is_finite() {
        value.clamp(low, high)
    } else {
        (low + high) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::label_spec;

    fn plain_spec() -> EditorialLabelSpec {
        EditorialLabelSpec {
            nudge_x: 0.0,
            nudge_y: 0.0,
            ..*label_spec("Laos").unwrap()
        }
    }

    #[test]
    fn test_square_country_lifted() {
        let bounds = Bounds::new(400.0, 200.0, 500.0, 300.0);
        let placement = place_label(&bounds, &plain_spec(), &ViewBox::FULL);

        // centre (450, 250) lifted by 16
        assert!((placement.left_pct - 450.0 / 960.0 * 100.0).abs() < 1e-9);
        assert!((placement.top_pct - 234.0 / 620.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_tall_country_lifted_more() {
        let bounds = Bounds::new(400.0, 100.0, 500.0, 400.0);
        let placement = place_label(&bounds, &plain_spec(), &ViewBox::FULL);
        let expected_y = 250.0 - 300.0 * TALL_LIFT_RATIO;
        assert!((placement.top_pct - expected_y / 620.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_wide_country_shifted_left() {
        let bounds = Bounds::new(300.0, 250.0, 600.0, 300.0);
        let placement = place_label(&bounds, &plain_spec(), &ViewBox::FULL);
        let expected_x = 450.0 - 300.0 * WIDE_SHIFT_RATIO;
        assert!((placement.left_pct - expected_x / 960.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_nudge_scales_with_view_box() {
        let bounds = Bounds::new(400.0, 200.0, 500.0, 300.0);
        let mut spec = plain_spec();
        spec.nudge_x = 0.1;

        let full = place_label(&bounds, &spec, &ViewBox::FULL);
        let base = place_label(&bounds, &plain_spec(), &ViewBox::FULL);
        assert!((full.left_pct - base.left_pct - 10.0).abs() < 1e-9);

        let zoomed_box = ViewBox::new(300.0, 150.0, 240.0, 155.0);
        let zoomed = place_label(&bounds, &spec, &zoomed_box);
        let zoomed_base = place_label(&bounds, &plain_spec(), &zoomed_box);
        assert!((zoomed.left_pct - zoomed_base.left_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_into_safe_band() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let placement = place_label(&bounds, &plain_spec(), &ViewBox::FULL);
        assert_eq!(placement.left_pct, 14.0);
        assert_eq!(placement.top_pct, 10.0);

        let bounds = Bounds::new(950.0, 610.0, 960.0, 620.0);
        let placement = place_label(&bounds, &plain_spec(), &ViewBox::FULL);
        assert_eq!(placement.left_pct, 86.0);
        assert_eq!(placement.top_pct, 76.0);
    }

    #[test]
    fn test_to_canvas() {
        let placement = LabelPlacement {
            left_pct: 50.0,
            top_pct: 25.0,
        };
        let vb = ViewBox::new(100.0, 40.0, 200.0, 120.0);
        assert_eq!(placement.to_canvas(&vb), (200.0, 70.0));
    }
}
