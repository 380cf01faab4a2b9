use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::task::Waker;

use futures::task::AtomicWaker;

/// Single-resolution latch holding the aggregate's value until it is taken.
///
/// The flag flips exactly once. Whoever flips it either stores a value
/// (`settle`) or stores nothing because the value was returned directly
/// (`close`). Everyone else observes `is_settled` and backs off.
pub(crate) struct Settlement<T> {
    settled: AtomicBool,
    value: Mutex<Option<T>>,
    waker: AtomicWaker,
}

impl<T> Settlement<T> {
    pub(crate) fn new() -> Self {
        Self {
            settled: AtomicBool::new(false),
            value: Mutex::new(None),
            waker: AtomicWaker::new(),
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }

    fn latch(&self) -> bool {
        self.settled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Stores `value` unless the latch already fired. Returns whether this
    /// call won.
    pub(crate) fn settle(&self, value: T) -> bool {
        if !self.latch() {
            return false;
        }

        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
        self.waker.wake();
        true
    }

    /// Fires the latch without storing anything.
    pub(crate) fn close(&self) -> bool {
        self.latch()
    }

    /// Registers the task that will [`take`](Self::take) the value.
    pub(crate) fn register(&self, waker: &Waker) {
        self.waker.register(waker);
    }

    /// Wakes the registered task without settling.
    pub(crate) fn wake(&self) {
        self.waker.wake();
    }

    pub(crate) fn take(&self) -> Option<T> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    use futures::task::noop_waker;

    #[test]
    fn test_settles_once() {
        let settlement = Settlement::new();

        assert!(!settlement.is_settled());
        assert!(settlement.settle(1));
        assert!(settlement.is_settled());
        assert!(!settlement.settle(2));
        assert!(!settlement.close());

        assert_eq!(settlement.take(), Some(1));
        assert_eq!(settlement.take(), None);
    }

    #[test]
    fn test_close_stores_nothing() {
        let settlement = Settlement::<i32>::new();

        assert!(settlement.close());
        assert!(!settlement.settle(5));
        assert_eq!(settlement.take(), None);
    }

    #[test]
    fn test_settle_wakes_registered_task() {
        let settlement = Settlement::new();
        settlement.register(&noop_waker());

        assert!(settlement.settle("done"));
        assert_eq!(settlement.take(), Some("done"));
    }

    #[test]
    fn test_concurrent_settle_has_one_winner() {
        let settlement = Arc::new(Settlement::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|id| {
                let settlement = settlement.clone();
                let winners = winners.clone();
                thread::spawn(move || {
                    if settlement.settle(id) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert!(settlement.take().is_some());
    }
}
