mod common;

use std::sync::Mutex;

use common::{init, later};
use core_algebra::iteration::{InterruptSignal, LoopResult, Signal};
use core_deferred::iteration::{array_async, for_each_async, map_async};
use core_deferred::Deferred;

#[test]
fn test_ready_callbacks_settle_inline() {
    init();

    let squares = map_async(vec![1, 2, 3], |value, _| Some(value * value));
    assert_eq!(squares.settled(), Some(Ok(vec![1, 4, 9])));

    let visited = for_each_async(["a", "b"], |_, _| ());
    assert_eq!(visited.settled(), Some(Ok(2)));
}

#[test]
fn test_unbounded_array_stops_at_ready_break() {
    init();

    let evens = array_async(None, |index| -> LoopResult<usize> {
        if index == 4 {
            InterruptSignal::Break.into()
        } else {
            Some(index * 2).into()
        }
    });

    assert_eq!(evens.settled(), Some(Ok(vec![0, 2, 4, 6])));
}

#[core_async::test]
async fn test_array_collects_deferred_values_in_index_order() {
    init();

    let values = array_async(Some(4), |index| later(40 - index as u64 * 10, Some(index)));
    assert_eq!(values.await, Ok(vec![0, 1, 2, 3]));
}

#[core_async::test]
async fn test_deferred_break_truncates_later_values() {
    init();

    let values = map_async(vec![5u64, 10, 1, 15], |delay, index| {
        let step = if index == 1 {
            Err(InterruptSignal::Break)
        } else {
            Ok(delay)
        };
        later(delay, step)
    });

    assert_eq!(values.await, Ok(vec![5]));
}

#[core_async::test]
async fn test_absent_value_aborts_map() {
    init();

    let outcome = map_async(["1", "2", "x", "4"], |input, _| {
        later(5, core_algebra::parsers::integer(input))
    });

    assert_eq!(outcome.await, Err(2));
}

#[core_async::test]
async fn test_for_each_reports_abort_index() {
    init();
    let seen = std::sync::Arc::new(Mutex::new(Vec::new()));

    let log = seen.clone();
    let outcome = for_each_async(vec![3, 1, 4, 1, 5], move |value, index| {
        log.lock().unwrap().push(index);
        if value == 4 {
            Deferred::ready(Signal::Abort)
        } else {
            later(5, Signal::Continue)
        }
    });

    assert_eq!(outcome.await, Err(2));
    // The ready abort stops the walk, so the tail is never visited.
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
}

#[core_async::test]
async fn test_for_each_counts_continued_items_before_break() {
    init();

    let outcome = for_each_async(0..10, |value, _| {
        later(2, if value < 6 { Signal::Continue } else { Signal::Break })
    });

    assert_eq!(outcome.await, Ok(6));
}

#[core_async::test]
async fn test_for_each_accepts_presence_and_flags() {
    init();

    let by_flag = for_each_async([true, true, false], |flag, _| later(1, flag));
    assert_eq!(by_flag.await, Err(2));

    let by_presence = for_each_async([Some(1), None], |option, _| option);
    assert_eq!(by_presence.settled(), Some(Err(1)));
}
