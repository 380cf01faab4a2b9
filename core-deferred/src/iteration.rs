//! Interruptible loops whose callbacks may be deferred.
//!
//! Callbacks are invoked eagerly, one per element, without waiting for
//! earlier deferred results. A ready interrupt stops the walk at once; a
//! deferred one is only known after every in-flight callback has settled,
//! and the interrupt at the lowest index wins. Results after that index are
//! discarded.

use core_algebra::iteration::{
    normalize_loop_result, normalize_void_result, InterruptSignal, LoopResult, Signal, VoidResult,
};
use futures::future::{join_all, FutureExt};
use tracing::debug;

use crate::async_result::AsyncResult;
use crate::deferred::{Deferred, IntoDeferred, Payload};

type Step<T> = Deferred<Result<T, InterruptSignal>>;

fn settle_loop<T>(
    values: Vec<Option<T>>,
    interrupt: Option<(usize, InterruptSignal)>,
) -> Result<Vec<T>, usize> {
    match interrupt {
        Some((index, InterruptSignal::Abort)) => {
            debug!(index, "deferred loop aborted");
            Err(index)
        }
        Some((index, InterruptSignal::Break)) => {
            Ok(values.into_iter().take(index).flatten().collect())
        }
        None => Ok(values.into_iter().flatten().collect()),
    }
}

fn run<T, I>(steps: I) -> Deferred<Result<Vec<T>, usize>>
where
    T: Send + 'static,
    I: IntoIterator<Item = Step<T>>,
{
    let mut values = Vec::new();
    let mut in_flight = Vec::new();
    let mut interrupt = None;

    for (index, step) in steps.into_iter().enumerate() {
        match step {
            Deferred::Ready(Ok(value)) => values.push(Some(value)),
            Deferred::Ready(Err(signal)) => {
                interrupt = Some((index, signal));
                break;
            }
            Deferred::Pending(future) => {
                values.push(None);
                in_flight.push(future.map(move |outcome| (index, outcome)));
            }
        }
    }

    if in_flight.is_empty() {
        return Deferred::Ready(settle_loop(values, interrupt));
    }

    Deferred::pending(async move {
        for (index, outcome) in join_all(in_flight).await {
            match outcome {
                Ok(value) => values[index] = Some(value),
                Err(signal) => {
                    if interrupt.map_or(true, |(at, _)| index < at) {
                        interrupt = Some((index, signal));
                    }
                }
            }
        }

        settle_loop(values, interrupt)
    })
}

fn void_step(result: impl Into<VoidResult>) -> Result<(), InterruptSignal> {
    match normalize_void_result(result) {
        Signal::Continue => Ok(()),
        Signal::Break => Err(InterruptSignal::Break),
        Signal::Abort => Err(InterruptSignal::Abort),
    }
}

/// Collects `callback(0)`, `callback(1)`, ... up to `length`. With
/// `length = None` the callback must eventually interrupt without deferring,
/// since deferred interrupts are only seen after the walk ends.
pub fn array_async<T, R, F>(length: Option<usize>, mut callback: F) -> AsyncResult<Vec<T>, usize>
where
    T: Payload,
    F: FnMut(usize) -> R,
    R: IntoDeferred,
    R::Output: Into<LoopResult<T>>,
{
    let steps = (0..length.unwrap_or(usize::MAX))
        .map(|index| callback(index).into_deferred().map(|output| normalize_loop_result(output)));

    AsyncResult::new(run(steps))
}

/// Runs `callback` for every item. Succeeds with the number of items that
/// continued the loop.
pub fn for_each_async<I, R, F>(items: I, mut callback: F) -> AsyncResult<usize, usize>
where
    I: IntoIterator,
    F: FnMut(I::Item, usize) -> R,
    R: IntoDeferred,
    R::Output: Into<VoidResult>,
{
    let steps = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| callback(item, index).into_deferred().map(void_step));

    AsyncResult::new(run(steps).map(|outcome| outcome.map(|continued| continued.len())))
}

/// Maps every item, stopping when the mapper interrupts.
pub fn map_async<I, U, R, F>(items: I, mut mapper: F) -> AsyncResult<Vec<U>, usize>
where
    I: IntoIterator,
    U: Payload,
    F: FnMut(I::Item, usize) -> R,
    R: IntoDeferred,
    R::Output: Into<LoopResult<U>>,
{
    let steps = items.into_iter().enumerate().map(|(index, item)| {
        mapper(item, index)
            .into_deferred()
            .map(|output| normalize_loop_result(output))
    });

    AsyncResult::new(run(steps))
}
