//! Selection-driven zoom and label choreography for the map
//!
//! [`MapStage`] sequences every selection change: hide the current label,
//! zoom the view box, then reveal the new label. Each change starts a new
//! run; continuations from older runs find a newer run id and stop.

pub mod deferred;
pub mod label;
pub mod viewport;

pub use deferred::{Deferred, Settled};
pub use label::{ActiveLabel, EXIT_DURATION, LabelChoreographer, LabelPhase};
pub use viewport::{RESET_DURATION, ViewportController, ZOOM_DURATION, ease_out_cubic};

use log::debug;
use std::time::Duration;

use crate::domain::{EditorialLabelSpec, FeatureCollection, canonical_name, label_spec, zoom_profile};
use crate::map::{
    LabelPlacement, MapOptions, MapPaths, ViewBox, build_map_paths, place_label,
    view_box_for_country,
};

/// The page-level "selected country or all" value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Country(&'static str),
}

impl Selection {
    /// Parse user input; "all" or an empty string selects everything,
    /// unknown names yield `None`
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("all") {
            return Some(Selection::All);
        }
        canonical_name(input).map(Selection::Country)
    }

    pub fn country(&self) -> Option<&'static str> {
        match self {
            Selection::All => None,
            Selection::Country(name) => Some(name),
        }
    }
}

/// Animation lengths for the two kinds of viewport transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimings {
    pub zoom: Duration,
    pub reset: Duration,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            zoom: ZOOM_DURATION,
            reset: RESET_DURATION,
        }
    }
}

/// Where a country selection run is waiting
#[derive(Debug)]
enum Continuation {
    Hiding {
        run: u64,
        country: &'static str,
        hidden: Deferred,
    },
    Zooming {
        run: u64,
        country: &'static str,
        arrived: Deferred,
    },
}

/// Read-only view of the label for renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSnapshot {
    pub spec: &'static EditorialLabelSpec,
    pub phase: LabelPhase,
    pub placement: LabelPlacement,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSnapshot {
    pub selection: Selection,
    pub view_box: ViewBox,
    pub label: Option<LabelSnapshot>,
}

/// Owns the map's derived geometry and all animation state
///
/// Single-threaded: the host calls [`MapStage::tick`] once per display
/// refresh with the frame time and routes user input to
/// [`MapStage::select`] / [`MapStage::toggle`].
#[derive(Debug)]
pub struct MapStage {
    map: MapPaths,
    viewport: ViewportController,
    labels: LabelChoreographer,
    selection: Selection,
    run_id: u64,
    pending: Option<Continuation>,
    timings: StageTimings,
}

impl MapStage {
    pub fn new(map: MapPaths, timings: StageTimings) -> Self {
        Self {
            map,
            viewport: ViewportController::default(),
            labels: LabelChoreographer::new(),
            selection: Selection::All,
            run_id: 0,
            pending: None,
            timings,
        }
    }

    pub fn map(&self) -> &MapPaths {
        &self.map
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn view_box(&self) -> ViewBox {
        self.viewport.view_box()
    }

    pub fn active_label(&self) -> Option<&ActiveLabel> {
        self.labels.active()
    }

    /// No animation, timer or continuation outstanding
    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && !self.viewport.is_animating() && self.labels.is_idle()
    }

    /// Replace the derived map, e.g. after a reload
    ///
    /// A selected country that the new map no longer knows resets to
    /// [`Selection::All`].
    pub fn set_map(&mut self, map: MapPaths, now: Duration) {
        self.map = map;
        if let Selection::Country(country) = self.selection
            && self.map.bounds_for(country).is_none()
        {
            debug!("Selected country {country} missing from new map, resetting");
            self.select(Selection::All, now);
        }
    }

    /// Rebuild the derived map from a freshly loaded collection
    pub fn set_features(&mut self, collection: &FeatureCollection, options: &MapOptions, now: Duration) {
        self.set_map(build_map_paths(&collection.features, options), now);
    }

    /// Select a country, or re-select it to go back to the full view
    pub fn toggle(&mut self, country: &'static str, now: Duration) {
        if self.selection == Selection::Country(country) {
            self.select(Selection::All, now);
        } else {
            self.select(Selection::Country(country), now);
        }
    }

    /// Keyboard activation of a country shape; Enter and Space toggle it
    ///
    /// Returns whether the key was handled.
    pub fn activate(&mut self, country: &'static str, key: &str, now: Duration) -> bool {
        match key {
            "Enter" | " " | "Space" | "Spacebar" => {
                self.toggle(country, now);
                true
            }
            _ => false,
        }
    }

    /// Start a new selection run
    pub fn select(&mut self, selection: Selection, now: Duration) {
        self.selection = selection;
        self.run_id += 1;
        let run = self.run_id;
        self.labels.cancel_exit();
        self.pending = None;
        debug!("Selection run {run}: {selection:?}");

        match selection {
            Selection::All => {
                self.labels.clear();
                self.viewport
                    .animate_to(ViewBox::FULL, self.timings.reset, now);
            }
            Selection::Country(country) => {
                let hidden = self.labels.hide(now, run);
                self.pending = Some(Continuation::Hiding {
                    run,
                    country,
                    hidden,
                });
                self.resume(now);
            }
        }
    }

    /// Advance everything to frame time `now`
    ///
    /// Label steps run first, then the viewport, then the waiting selection
    /// run, so a label revealed in this frame turns visible on the next one.
    pub fn tick(&mut self, now: Duration) {
        self.labels.tick(now, self.run_id);
        self.viewport.tick(now);
        self.resume(now);
    }

    /// Continue the pending run for as long as what it waits on has settled
    fn resume(&mut self, now: Duration) {
        while let Some(continuation) = self.pending.take() {
            match continuation {
                Continuation::Hiding {
                    run,
                    country,
                    hidden,
                } => {
                    match hidden.outcome() {
                        None => {
                            self.pending = Some(Continuation::Hiding {
                                run,
                                country,
                                hidden,
                            });
                            return;
                        }
                        Some(Settled::Superseded) => return,
                        Some(_) => {}
                    }
                    if run != self.run_id {
                        return;
                    }

                    let Some(bounds) = self.map.bounds_for(country).copied() else {
                        debug!("No bounds for {country}, showing the full region");
                        self.viewport
                            .animate_to(ViewBox::FULL, self.timings.reset, now);
                        return;
                    };

                    let target = view_box_for_country(&bounds, &zoom_profile(country));
                    let arrived = self.viewport.animate_to(target, self.timings.zoom, now);
                    self.pending = Some(Continuation::Zooming {
                        run,
                        country,
                        arrived,
                    });
                }
                Continuation::Zooming {
                    run,
                    country,
                    arrived,
                } => {
                    match arrived.outcome() {
                        None => {
                            self.pending = Some(Continuation::Zooming {
                                run,
                                country,
                                arrived,
                            });
                            return;
                        }
                        Some(Settled::Superseded) => return,
                        Some(_) => {}
                    }
                    if run == self.run_id {
                        self.labels.show(country, run);
                    }
                    return;
                }
            }
        }
    }

    pub fn snapshot(&self) -> StageSnapshot {
        let view_box = self.viewport.view_box();
        let label = self.labels.active().and_then(|active| {
            let spec = label_spec(active.country)?;
            let bounds = self.map.bounds_for(active.country)?;
            Some(LabelSnapshot {
                spec,
                phase: active.phase,
                placement: place_label(bounds, spec, &view_box),
            })
        });

        StageSnapshot {
            selection: self.selection,
            view_box,
            label,
        }
    }
}
