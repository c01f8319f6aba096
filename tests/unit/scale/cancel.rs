use super::*;
use crate::foundation::error::ResizeError;
use std::sync::atomic::AtomicUsize;
use std::task::Wake;

#[derive(Default)]
struct CountingWake(AtomicUsize);

impl Wake for CountingWake {
    fn wake(self: Arc<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn counting() -> (Arc<CountingWake>, Waker) {
    let counter = Arc::new(CountingWake::default());
    let waker = Waker::from(Arc::clone(&counter));
    (counter, waker)
}

#[test]
fn fresh_token_is_live() {
    let token = CancelToken::new();
    assert!(token.check().is_ok());
    assert!(!token.is_cancelled());
    assert_eq!(token.deadline(), None);
}

#[test]
fn cancel_is_seen_by_clones() {
    let token = CancelToken::new();
    let seen_elsewhere = token.clone();
    token.cancel();
    assert!(matches!(seen_elsewhere.check(), Err(StopReason::Cancelled)));
}

#[test]
fn elapsed_deadline_reports_timed_out() {
    let token = CancelToken::with_deadline(Instant::now() - Duration::from_millis(1));
    assert!(matches!(token.check(), Err(StopReason::TimedOut)));
    assert!(token.is_cancelled());
}

#[test]
fn explicit_cancel_wins_over_deadline() {
    let token = CancelToken::with_deadline(Instant::now() - Duration::from_millis(1));
    token.cancel();
    assert!(matches!(token.check(), Err(StopReason::Cancelled)));
}

#[test]
fn future_deadline_is_live() {
    let token = CancelToken::with_timeout(Duration::from_secs(3600));
    assert!(token.check().is_ok());
    assert!(token.deadline().is_some());
}

#[test]
fn stop_reasons_map_onto_resize_errors() {
    let cancelled = CancelToken::new();
    cancelled.cancel();
    let err = ResizeError::from(cancelled.check().unwrap_err());
    assert!(matches!(err, ResizeError::Cancelled));

    let late = CancelToken::with_deadline(Instant::now() - Duration::from_millis(1));
    let err = ResizeError::from(late.check().unwrap_err());
    assert!(matches!(err, ResizeError::DeadlineExceeded));
}

#[test]
fn cancel_wakes_registered_wakers_once() {
    let token = CancelToken::new();
    let (counter, waker) = counting();
    let _guard = token.on_cancel(waker);

    token.cancel();
    token.cancel();
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
}

#[test]
fn registering_on_a_cancelled_token_wakes_immediately() {
    let token = CancelToken::new();
    token.cancel();
    let (counter, waker) = counting();
    let _guard = token.on_cancel(waker);
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
}

#[test]
fn dropped_registration_is_not_woken() {
    let token = CancelToken::new();
    let (counter, waker) = counting();
    drop(token.on_cancel(waker));

    token.cancel();
    assert_eq!(counter.0.load(Ordering::SeqCst), 0);
}
