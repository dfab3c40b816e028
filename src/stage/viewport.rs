use log::trace;
use std::time::Duration;

use super::deferred::{Deferred, Settled};
use crate::map::ViewBox;

/// Zoom-in duration towards a country
pub const ZOOM_DURATION: Duration = Duration::from_millis(680);
/// Zoom-out duration back to the full region
pub const RESET_DURATION: Duration = Duration::from_millis(420);

/// Ease-out cubic: fast start, gentle landing
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug)]
struct Flight {
    from: ViewBox,
    to: ViewBox,
    start: Duration,
    duration: Duration,
    done: Deferred,
}

/// Owns the visible view box and animates it frame by frame
///
/// The host calls [`ViewportController::tick`] from its display-refresh
/// callback with the frame timestamp; nothing here runs on a timer.
#[derive(Debug)]
pub struct ViewportController {
    current: ViewBox,
    flight: Option<Flight>,
}

impl ViewportController {
    pub fn new(initial: ViewBox) -> Self {
        Self {
            current: initial,
            flight: None,
        }
    }

    /// The committed view box for this frame
    pub fn view_box(&self) -> ViewBox {
        self.current
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Where the in-flight animation is heading, if any
    pub fn target(&self) -> Option<ViewBox> {
        self.flight.as_ref().map(|f| f.to)
    }

    /// Start animating towards `target`
    ///
    /// A target within epsilon of the current view box is committed at once
    /// and settles as [`Settled::Snapped`]. Otherwise any in-flight animation
    /// settles as [`Settled::Superseded`] and the new one starts from the
    /// current, possibly mid-flight, view box.
    pub fn animate_to(&mut self, target: ViewBox, duration: Duration, now: Duration) -> Deferred {
        if target.approx_eq(&self.current) {
            self.cancel();
            self.current = target;
            return Deferred::settled(Settled::Snapped);
        }

        self.cancel();

        let done = Deferred::new();
        self.flight = Some(Flight {
            from: self.current,
            to: target,
            start: now,
            duration,
            done: done.clone(),
        });
        done
    }

    /// Drop the in-flight animation, leaving the view box where it is
    pub fn cancel(&mut self) {
        if let Some(flight) = self.flight.take() {
            flight.done.resolve(Settled::Superseded);
        }
    }

    /// Advance the animation to frame time `now`
    ///
    /// Returns `true` when the committed view box changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(flight) = &self.flight else {
            return false;
        };

        let t = if flight.duration.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_sub(flight.start);
            (elapsed.as_secs_f64() / flight.duration.as_secs_f64()).clamp(0.0, 1.0)
        };

        if t >= 1.0 {
            // land exactly on the target, not on the interpolated value
            self.current = flight.to;
            if let Some(flight) = self.flight.take() {
                flight.done.resolve(Settled::Completed);
            }
            trace!("viewBox settled at {}", self.current.to_attribute());
            return true;
        }

        self.current = flight.from.lerp(&flight.to, ease_out_cubic(t));
        true
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewBox::FULL)
    }
}
