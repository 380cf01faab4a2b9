#![allow(dead_code)]

use std::sync::Arc;

use core_async::time::{sleep, Duration};
use core_deferred::Deferred;
use mockall::mock;

/// Records which callbacks ran.
pub trait Recorder: Send + Sync {
    fn hit(&self, label: &'static str);
}

mock! {
    pub Recorder {}

    impl Recorder for Recorder {
        fn hit(&self, label: &'static str);
    }
}

/// A recorder that expects `label` exactly `times` times and nothing else.
pub fn recorder_expecting(expectations: &[(&'static str, usize)]) -> Arc<MockRecorder> {
    let mut recorder = MockRecorder::new();
    for &(label, times) in expectations {
        recorder
            .expect_hit()
            .withf(move |hit| hit == label)
            .times(times)
            .return_const(());
    }
    Arc::new(recorder)
}

/// Settles with `value` after `millis` milliseconds.
pub fn later<T: Send + 'static>(millis: u64, value: T) -> Deferred<T> {
    Deferred::pending(async move {
        sleep(Duration::from_millis(millis)).await;
        value
    })
}

pub fn init() {
    core_runtime::init_test_logging();
}
