//! Page-level loading indicator.
//!
//! Every API call holds a [`LoadingGuard`] for its duration. The indicator is
//! shown when the first guard is taken and hidden when the last one drops, so
//! it is cleared on every exit path, including errors and parallel fetches.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

pub trait LoadingIndicator: Send + Sync {
    fn set_loading(&self, visible: bool);
}

struct NoIndicator;

impl LoadingIndicator for NoIndicator {
    fn set_loading(&self, _visible: bool) {}
}

#[derive(Clone)]
pub struct Loading {
    indicator: Arc<dyn LoadingIndicator>,
    in_flight: Arc<AtomicUsize>,
}

impl Loading {
    pub fn new(indicator: Arc<dyn LoadingIndicator>) -> Self {
        Self {
            indicator,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A counter with nothing attached to it.
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoIndicator))
    }

    pub fn acquire(&self) -> LoadingGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.indicator.set_loading(true);
        }
        LoadingGuard {
            loading: self.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Loading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loading")
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

#[must_use = "the indicator is released when the guard drops"]
pub struct LoadingGuard {
    loading: Loading,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if self.loading.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.loading.indicator.set_loading(false);
        }
    }
}
