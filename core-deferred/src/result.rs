//! Aggregate combinators over deferred outcome containers.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::LazyLock;

use core_algebra::{Field, Panicked};
use futures::FutureExt;

use crate::async_result::AsyncResult;
use crate::combinator::{gather, AllResults, AnyResult, ExtractResults};
use crate::deferred::{IntoDeferred, Payload};

/// Canonical succeeded-unit value. Shared and immutable.
pub static EMPTY: LazyLock<AsyncResult<(), Infallible>> =
    LazyLock::new(|| AsyncResult::success(()));

/// Succeeds when every input succeeds; values keep input order.
///
/// The first `Err` to settle decides the aggregate and is returned as is.
pub fn all<T, E, I>(results: I) -> AsyncResult<Vec<T>, E>
where
    T: Payload,
    E: Payload,
    I: IntoIterator,
    I::Item: IntoDeferred<Output = Result<T, E>>,
{
    let inputs: Vec<_> = results
        .into_iter()
        .map(IntoDeferred::into_deferred)
        .collect();
    let strategy = AllResults::with_capacity(inputs.len());

    AsyncResult::new(gather(strategy, inputs.into_iter().enumerate()))
}

/// Succeeds with the first input to settle successfully. When every input
/// fails, the failure carries one error per input, in input order.
///
/// # Examples
///
/// ```rust
/// use core_deferred::{result, Deferred};
///
/// # core_async::runtime::block_on(async {
/// let outcome = result::any(vec![
///     Deferred::ready(Err::<i32, _>("offline")),
///     Deferred::pending(async { Err("timeout") }),
/// ]);
///
/// assert_eq!(outcome.await, Err(vec!["offline", "timeout"]));
/// # });
/// ```
pub fn any<T, E, I>(results: I) -> AsyncResult<T, Vec<E>>
where
    T: Payload,
    E: Payload,
    I: IntoIterator,
    I::Item: IntoDeferred<Output = Result<T, E>>,
{
    let inputs: Vec<_> = results
        .into_iter()
        .map(IntoDeferred::into_deferred)
        .collect();
    let strategy = AnyResult::with_capacity(inputs.len());

    AsyncResult::new(gather(strategy, inputs.into_iter().enumerate()))
}

/// Keyed join that waits for every field. On failure the error map holds
/// only the fields that failed.
pub fn extract<K, T, E, D, I>(fields: I) -> AsyncResult<HashMap<K, T>, HashMap<K, E>>
where
    K: Payload + Eq + Hash,
    T: Payload,
    E: Payload,
    D: IntoDeferred<Output = Result<T, E>>,
    I: IntoIterator<Item = (K, Field<D>)>,
{
    let inputs = fields
        .into_iter()
        .map(|(key, field)| (key, field.resolve().into_deferred()));

    AsyncResult::new(gather(ExtractResults::default(), inputs))
}

/// Runs `factory`; a panic becomes a [`Panicked`] failure.
pub fn handle<T, F>(factory: F) -> AsyncResult<T, Panicked>
where
    T: Payload,
    F: FnOnce() -> T,
{
    AsyncResult::new(core_algebra::result::handle(factory))
}

/// Like [`handle`], but for a factory returning a future. A panic in the
/// factory or while the future runs becomes a [`Panicked`] failure.
pub fn handle_async<T, Fut, F>(factory: F) -> AsyncResult<T, Panicked>
where
    T: Payload,
    Fut: Future<Output = T> + Send + 'static,
    F: FnOnce() -> Fut,
{
    match catch_unwind(AssertUnwindSafe(factory)) {
        Ok(future) => AsyncResult::from_future(
            AssertUnwindSafe(future)
                .catch_unwind()
                .map(|outcome| outcome.map_err(Panicked::from_payload)),
        ),
        Err(payload) => AsyncResult::failure(Panicked::from_payload(payload)),
    }
}
