//! Join/race engine behind `all`, `any` and `extract`.
//!
//! Inputs are classified as they are pulled from the iterator. Ready inputs go
//! straight to the [`Strategy`]; pending ones are detached onto the runtime
//! with a continuation that feeds the same accumulator. A strategy that breaks
//! settles the aggregate immediately and every later continuation becomes a
//! no-op. Detached inputs keep running to completion either way.
//!
//! A detached input whose task is dropped before it settles, typically because
//! its runtime shut down, is handed back to the aggregate and driven by
//! whoever awaits it.

mod settlement;
mod strategy;

use std::future::Future;
use std::mem;
use std::ops::ControlFlow;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::thread;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tracing::{debug, trace};

use crate::deferred::Deferred;

use settlement::Settlement;
pub(crate) use strategy::{
    AllOptions, AllResults, AnyOption, AnyResult, ExtractOptions, ExtractResults,
};

/// Folds settled inputs into an aggregate.
pub(crate) trait Strategy: Send + 'static {
    type Key: Send + 'static;
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Used in log output.
    const NAME: &'static str;

    /// Records one settled input. `Break` decides the aggregate.
    fn accept(&mut self, key: Self::Key, input: Self::Input) -> ControlFlow<Self::Output>;

    /// Builds the aggregate once every input was accepted without a break.
    fn finish(&mut self) -> Self::Output;
}

/// A pending input with panics caught.
type Guarded<S> = BoxFuture<'static, thread::Result<<S as Strategy>::Input>>;

struct Accumulator<S> {
    strategy: S,
    /// Outstanding inputs, plus one for the classification pass itself.
    pending: usize,
}

struct Aggregate<S: Strategy> {
    accumulator: Mutex<Accumulator<S>>,
    /// Inputs whose detached task went away before they settled.
    orphans: Mutex<Vec<(S::Key, Guarded<S>)>>,
    settlement: Settlement<thread::Result<S::Output>>,
}

impl<S: Strategy> Aggregate<S> {
    fn lock(&self) -> MutexGuard<'_, Accumulator<S>> {
        self.accumulator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Drops one pending reference and settles with `finish` on the last one.
    fn release(&self, accumulator: &mut Accumulator<S>) {
        accumulator.pending -= 1;
        if accumulator.pending == 0 {
            let output = accumulator.strategy.finish();
            self.settlement.settle(Ok(output));
        }
    }

    fn on_settled(&self, key: S::Key, input: thread::Result<S::Input>) {
        let mut accumulator = self.lock();

        if self.settlement.is_settled() {
            trace!(combinator = S::NAME, "input settled after resolution, ignoring");
            return;
        }

        match input {
            Ok(input) => match accumulator.strategy.accept(key, input) {
                ControlFlow::Break(output) => {
                    debug!(combinator = S::NAME, "short-circuited by a deferred input");
                    self.settlement.settle(Ok(output));
                }
                ControlFlow::Continue(()) => self.release(&mut accumulator),
            },
            Err(panic) => {
                debug!(combinator = S::NAME, "deferred input panicked");
                self.settlement.settle(Err(panic));
            }
        }
    }

    fn adopt(&self, key: S::Key, input: Guarded<S>) {
        if self.settlement.is_settled() {
            return;
        }

        trace!(combinator = S::NAME, "detached input dropped before settling");
        self.orphans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key, input));
        self.settlement.wake();
    }

    fn take_orphans(&self) -> Vec<(S::Key, Guarded<S>)> {
        mem::take(&mut *self.orphans.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// One pending input running as a detached task.
struct Detached<S: Strategy> {
    aggregate: Arc<Aggregate<S>>,
    input: Option<(S::Key, Guarded<S>)>,
}

impl<S: Strategy> Detached<S> {
    async fn run(mut self) {
        let Some((_, input)) = self.input.as_mut() else {
            return;
        };
        let settled = input.await;

        if let Some((key, _)) = self.input.take() {
            self.aggregate.on_settled(key, settled);
        }
    }
}

impl<S: Strategy> Drop for Detached<S> {
    fn drop(&mut self) {
        if let Some((key, input)) = self.input.take() {
            self.aggregate.adopt(key, input);
        }
    }
}

/// The awaiting side of a pending aggregate.
///
/// Besides waiting for the settlement it drives any input handed back by a
/// dropped [`Detached`] task. An input that was already polled on a runtime
/// that has since shut down may panic when resumed; that panic resurfaces
/// here like any other.
struct Gathering<S: Strategy> {
    aggregate: Arc<Aggregate<S>>,
    adopted: FuturesUnordered<BoxFuture<'static, (S::Key, thread::Result<S::Input>)>>,
}

impl<S: Strategy> Future for Gathering<S> {
    type Output = S::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<S::Output> {
        let this = &mut *self;
        this.aggregate.settlement.register(cx.waker());

        if !this.aggregate.settlement.is_settled() {
            for (key, input) in this.aggregate.take_orphans() {
                debug!(combinator = S::NAME, "driving an abandoned input in place");
                this.adopted
                    .push(input.map(move |input| (key, input)).boxed());
            }
        }

        while let Poll::Ready(Some((key, input))) = this.adopted.poll_next_unpin(cx) {
            this.aggregate.on_settled(key, input);
        }

        match this.aggregate.settlement.take() {
            Some(Ok(output)) => Poll::Ready(output),
            Some(Err(panic)) => resume_unwind(panic),
            None => Poll::Pending,
        }
    }
}

/// Runs `strategy` over `inputs`.
///
/// Resolves synchronously when no input is pending or a ready input decides
/// the aggregate. A panic inside a pending input resurfaces when the returned
/// value is awaited.
pub(crate) fn gather<S, I>(strategy: S, inputs: I) -> Deferred<S::Output>
where
    S: Strategy,
    I: IntoIterator<Item = (S::Key, Deferred<S::Input>)>,
{
    let aggregate = Arc::new(Aggregate {
        accumulator: Mutex::new(Accumulator {
            strategy,
            pending: 1,
        }),
        orphans: Mutex::new(Vec::new()),
        settlement: Settlement::new(),
    });
    let mut detached = 0usize;

    for (key, input) in inputs {
        match input {
            Deferred::Ready(input) => {
                let mut accumulator = aggregate.lock();
                if aggregate.settlement.is_settled() {
                    break;
                }

                if let ControlFlow::Break(output) = accumulator.strategy.accept(key, input) {
                    debug!(combinator = S::NAME, "short-circuited by a ready input");
                    if aggregate.settlement.close() {
                        return Deferred::Ready(output);
                    }
                    break;
                }
            }
            Deferred::Pending(future) => {
                {
                    let mut accumulator = aggregate.lock();
                    if aggregate.settlement.is_settled() {
                        break;
                    }
                    accumulator.pending += 1;
                }

                detached += 1;
                let job = Detached {
                    aggregate: Arc::clone(&aggregate),
                    input: Some((key, AssertUnwindSafe(future).catch_unwind().boxed())),
                };
                core_async::task::detach(job.run());
            }
        }
    }

    if detached == 0 {
        let output = aggregate.lock().strategy.finish();
        return Deferred::Ready(output);
    }

    trace!(combinator = S::NAME, detached, "waiting for deferred inputs");
    {
        let mut accumulator = aggregate.lock();
        if !aggregate.settlement.is_settled() {
            aggregate.release(&mut accumulator);
        }
    }

    Deferred::pending(Gathering {
        aggregate,
        adopted: FuturesUnordered::new(),
    })
}
