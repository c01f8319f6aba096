use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::Waker;
use std::time::{Duration, Instant};

use enough::{Stop, StopReason};

/// Cooperative cancellation signal shared between a caller and a resize run.
///
/// Cloning is cheap and every clone observes the same signal. The token
/// reports [`StopReason::Cancelled`] once [`cancel`](Self::cancel) is called and
/// [`StopReason::TimedOut`] once its deadline elapses; an explicit cancel wins.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    wakers: Mutex<Vec<(u64, Waker)>>,
    next_waker: AtomicU64,
}

impl CancelToken {
    /// A token that only trips when cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            inner: Arc::new(Inner {
                deadline: Some(deadline),
                ..Inner::default()
            }),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Trip the token and wake everything registered through [`on_cancel`](Self::on_cancel).
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        let woken = std::mem::take(&mut *self.wakers());
        for (_, waker) in woken {
            waker.wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Wake `waker` when the token is cancelled explicitly, or right away if it
    /// already was. Deadlines do not wake; waiters re-check them on their own.
    ///
    /// The registration lasts until the returned guard is dropped.
    pub fn on_cancel(&self, waker: Waker) -> CancelWake<'_> {
        let mut wakers = self.wakers();
        if self.inner.cancelled.load(Ordering::Acquire) {
            drop(wakers);
            waker.wake();
            return CancelWake {
                token: self,
                id: None,
            };
        }
        let id = self.inner.next_waker.fetch_add(1, Ordering::Relaxed);
        wakers.push((id, waker));
        CancelWake {
            token: self,
            id: Some(id),
        }
    }

    fn wakers(&self) -> MutexGuard<'_, Vec<(u64, Waker)>> {
        self.inner
            .wakers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Stop for CancelToken {
    fn check(&self) -> Result<(), StopReason> {
        if self.inner.cancelled.load(Ordering::Acquire) {
            return Err(StopReason::Cancelled);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(StopReason::TimedOut),
            _ => Ok(()),
        }
    }
}

/// Keeps a waker registered with a [`CancelToken`]; deregisters on drop.
#[derive(Debug)]
#[must_use = "dropping the guard deregisters the waker immediately"]
pub struct CancelWake<'a> {
    token: &'a CancelToken,
    id: Option<u64>,
}

impl Drop for CancelWake<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.token.wakers().retain(|(other, _)| *other != id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scale/cancel.rs"]
mod tests;
