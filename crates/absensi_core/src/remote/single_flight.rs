//! At-most-one in-flight guard per request kind.

use std::sync::atomic::{AtomicBool, Ordering};

/// Admits one holder at a time; later callers are turned away, not queued.
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a permit, or `None` while another permit is alive.
    pub fn try_acquire(&self) -> Option<FlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightPermit { owner: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Released on drop, including during unwinding.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    owner: &'a SingleFlight,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.owner.busy.store(false, Ordering::Release);
    }
}
