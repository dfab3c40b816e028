use geo::{Coord, coord};

use super::bounds::Bounds;

/// Fixed drawing surface every map is laid out on
pub const CANVAS_WIDTH: f64 = 960.0;
pub const CANVAS_HEIGHT: f64 = 620.0;

/// Maps projected-plane coordinates onto the fixed canvas
///
/// Applies `screen = plane * scale + offset` per axis. The y scale is
/// negative for fitted projectors so north ends up at the top of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasProjector {
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl CanvasProjector {
    /// Pass-through projector used when there is nothing to fit
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Fit `bounds` into the canvas, keeping a `margin` (px) on every side
    ///
    /// Aspect ratio is preserved (`scale = min(inner_w / dx, inner_h / dy)`)
    /// and the leftover space is split evenly, letterboxing the map.
    pub fn fit(bounds: &Bounds, margin: f64) -> Self {
        let inner_width = (CANVAS_WIDTH - 2.0 * margin).max(1.0);
        let inner_height = (CANVAS_HEIGHT - 2.0 * margin).max(1.0);
        let dx = bounds.width();
        let dy = bounds.height();

        let scale = match (dx > 0.0 && dx.is_finite(), dy > 0.0 && dy.is_finite()) {
            (true, true) => (inner_width / dx).min(inner_height / dy),
            (true, false) => inner_width / dx,
            (false, true) => inner_height / dy,
            (false, false) => 1.0,
        };

        let scaled_width = dx.max(0.0) * scale;
        let scaled_height = dy.max(0.0) * scale;

        let offset_x = (CANVAS_WIDTH - scaled_width) / 2.0 - bounds.min_x * scale;
        let offset_y = (CANVAS_HEIGHT - scaled_height) / 2.0 + bounds.max_y * scale;

        Self {
            scale_x: scale,
            scale_y: -scale,
            offset_x,
            offset_y,
        }
    }

    /// Map a projected-plane point to canvas coordinates
    pub fn to_canvas(&self, point: Coord<f64>) -> Coord<f64> {
        coord! {
            x: point.x * self.scale_x + self.offset_x,
            y: point.y * self.scale_y + self.offset_y,
        }
    }

    /// Get the scale factor (canvas px per projected unit)
    pub fn scale_factor(&self) -> f64 {
        self.scale_x
    }
}
