use std::time::Duration;

use super::deferred::{Deferred, Settled};

/// Length of the label's exit transition
pub const EXIT_DURATION: Duration = Duration::from_millis(860);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPhase {
    /// Mounted but styled invisible so the fade-in can play
    Entering,
    Visible,
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveLabel {
    pub country: &'static str,
    pub phase: LabelPhase,
}

#[derive(Debug)]
struct ExitTimer {
    run: u64,
    deadline: Duration,
    done: Deferred,
}

/// Drives the single editorial label through entering, visible and exiting
///
/// Deferred steps (the entering to visible flip on the next frame and the
/// exit timer) remember the run id they were started under and do nothing
/// if a newer run has begun by the time they fire.
#[derive(Debug, Default)]
pub struct LabelChoreographer {
    active: Option<ActiveLabel>,
    reveal: Option<u64>,
    exit: Option<ExitTimer>,
}

impl LabelChoreographer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveLabel> {
        self.active.as_ref()
    }

    /// No deferred step outstanding
    pub fn is_idle(&self) -> bool {
        self.reveal.is_none() && self.exit.is_none()
    }

    /// Mount `country`'s label as entering; the next tick makes it visible
    pub fn show(&mut self, country: &'static str, run: u64) {
        self.cancel_exit();
        self.active = Some(ActiveLabel {
            country,
            phase: LabelPhase::Entering,
        });
        self.reveal = Some(run);
    }

    /// Start the exit transition; settles once the label is gone
    pub fn hide(&mut self, now: Duration, run: u64) -> Deferred {
        if self.active.is_none() {
            return Deferred::settled(Settled::Completed);
        }

        self.cancel_exit();
        self.reveal = None;
        if let Some(label) = self.active.as_mut() {
            label.phase = LabelPhase::Exiting;
        }

        let done = Deferred::new();
        self.exit = Some(ExitTimer {
            run,
            deadline: now + EXIT_DURATION,
            done: done.clone(),
        });
        done
    }

    /// Cancel a pending exit timer; whoever awaits it sees `Superseded`
    pub fn cancel_exit(&mut self) {
        if let Some(timer) = self.exit.take() {
            timer.done.resolve(Settled::Superseded);
        }
    }

    /// Drop the label immediately
    pub fn clear(&mut self) {
        self.cancel_exit();
        self.reveal = None;
        self.active = None;
    }

    /// Run deferred steps due at frame time `now`
    pub fn tick(&mut self, now: Duration, current_run: u64) {
        if let Some(run) = self.reveal.take()
            && run == current_run
            && let Some(label) = self.active.as_mut()
            && label.phase == LabelPhase::Entering
        {
            label.phase = LabelPhase::Visible;
        }

        let due = self.exit.as_ref().is_some_and(|timer| now >= timer.deadline);
        if !due {
            return;
        }
        if let Some(timer) = self.exit.take() {
            if timer.run == current_run {
                self.active = None;
                timer.done.resolve(Settled::Completed);
            } else {
                timer.done.resolve(Settled::Superseded);
            }
        }
    }
}
