use std::cell::Cell;
use std::rc::Rc;

/// How a deferred operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Ran to the end
    Completed,
    /// Target was already reached; nothing was animated
    Snapped,
    /// A newer operation took over before this one finished
    Superseded,
}

/// Settle-once outcome shared between an operation and whoever awaits it
///
/// Single-threaded: the stage and its callers live on the UI thread, so a
/// plain `Rc<Cell>` is enough.
#[derive(Debug, Clone, Default)]
pub struct Deferred {
    state: Rc<Cell<Option<Settled>>>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    /// An already settled outcome
    pub fn settled(outcome: Settled) -> Self {
        let deferred = Self::new();
        deferred.resolve(outcome);
        deferred
    }

    /// Settle; later calls are ignored
    pub(crate) fn resolve(&self, outcome: Settled) {
        if self.state.get().is_none() {
            self.state.set(Some(outcome));
        }
    }

    pub fn outcome(&self) -> Option<Settled> {
        self.state.get()
    }

    pub fn is_settled(&self) -> bool {
        self.outcome().is_some()
    }
}
