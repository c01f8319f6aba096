use std::num::NonZeroUsize;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::{Wake, Waker};
use std::time::Duration;

use enough::Stop;

use crate::foundation::error::ResizeResult;

/// Upper bound on how long a blocked acquire goes without re-checking its
/// stop token. Only deadlines and stops that never wake the gate wait this long.
const CANCEL_POLL: Duration = Duration::from_millis(5);

/// Cap on concurrently running frame scale jobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Limited(NonZeroUsize),
    Unlimited,
}

impl Parallelism {
    /// Map an integer limit; zero and negative values disable throttling.
    pub fn from_limit(limit: i64) -> Self {
        usize::try_from(limit)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(Self::Unlimited, Self::Limited)
    }

    /// One job per available hardware thread.
    pub fn available() -> Self {
        Self::Limited(std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN))
    }

    pub fn limit(self) -> Option<usize> {
        match self {
            Self::Limited(n) => Some(n.get()),
            Self::Unlimited => None,
        }
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::available()
    }
}

/// Counting admission gate (a blocking semaphore) that gives up as soon as
/// its [`Stop`] token trips.
#[derive(Debug)]
pub struct AdmissionGate {
    capacity: Option<usize>,
    signal: Arc<GateSignal>,
}

#[derive(Debug, Default)]
struct GateSignal {
    state: Mutex<GateState>,
    freed: Condvar,
}

#[derive(Debug, Default)]
struct GateState {
    in_use: usize,
    peak: usize,
}

/// Held while a job runs; the slot returns to the gate on drop.
#[derive(Debug)]
#[must_use = "dropping a permit releases its slot immediately"]
pub struct Permit<'a> {
    gate: &'a AdmissionGate,
}

impl AdmissionGate {
    pub fn new(parallelism: Parallelism) -> Self {
        Self {
            capacity: parallelism.limit(),
            signal: Arc::new(GateSignal::default()),
        }
    }

    /// Block until a slot is free, or fail as soon as `stop` trips.
    ///
    /// The token is checked before every admission, so a tripped token never
    /// admits another job even when slots are free.
    pub fn acquire(&self, stop: &dyn Stop) -> ResizeResult<Permit<'_>> {
        let mut state = self.signal.lock();
        loop {
            stop.check()?;
            if self.capacity.is_none_or(|cap| state.in_use < cap) {
                state.in_use += 1;
                state.peak = state.peak.max(state.in_use);
                return Ok(Permit { gate: self });
            }

            state = self
                .signal
                .freed
                .wait_timeout(state, CANCEL_POLL)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
    }

    /// A waker that rouses every blocked [`acquire`](Self::acquire) so it
    /// re-checks its stop token. Register it with whatever trips that token.
    pub fn waker(&self) -> Waker {
        Waker::from(Arc::clone(&self.signal))
    }

    #[cfg(test)]
    pub(crate) fn in_use(&self) -> usize {
        self.signal.lock().in_use
    }

    /// Most permits ever held at once.
    pub fn peak(&self) -> usize {
        self.signal.lock().peak
    }
}

impl GateSignal {
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Wake for GateSignal {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        // Taking the lock orders this after any waiter's token check.
        let _state = self.lock();
        self.freed.notify_all();
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let mut state = self.gate.signal.lock();
        state.in_use = state.in_use.saturating_sub(1);
        drop(state);
        self.gate.signal.freed.notify_one();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scale/gate.rs"]
mod tests;
