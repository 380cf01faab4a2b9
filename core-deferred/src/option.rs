//! Aggregate combinators over deferred presence containers.
//!
//! Inputs can be anything [`IntoDeferred`] with an `Option<T>` output: plain
//! options, [`Deferred`](crate::Deferred) values, boxed futures or
//! [`AsyncOption`]s. Ready inputs are folded immediately; pending ones need
//! no special treatment from the caller.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::LazyLock;

use core_algebra::Field;
use futures::FutureExt;

use crate::async_option::AsyncOption;
use crate::combinator::{gather, AllOptions, AnyOption, ExtractOptions};
use crate::deferred::{IntoDeferred, Payload};

/// Canonical present-unit value. Shared and immutable.
pub static EMPTY: LazyLock<AsyncOption<()>> = LazyLock::new(|| AsyncOption::some(()));

/// Present only when every input is present; values keep input order.
///
/// The first `None` to settle decides the aggregate without waiting for the
/// remaining inputs.
///
/// # Examples
///
/// ```rust
/// use core_deferred::{option, Deferred};
///
/// # core_async::runtime::block_on(async {
/// let values = option::all(vec![
///     Deferred::pending(async { Some(1) }),
///     Deferred::ready(Some(2)),
/// ]);
///
/// assert_eq!(values.await, Some(vec![1, 2]));
/// # });
/// ```
pub fn all<T, I>(options: I) -> AsyncOption<Vec<T>>
where
    T: Payload,
    I: IntoIterator,
    I::Item: IntoDeferred<Output = Option<T>>,
{
    let inputs: Vec<_> = options
        .into_iter()
        .map(IntoDeferred::into_deferred)
        .collect();
    let strategy = AllOptions::with_capacity(inputs.len());

    AsyncOption::new(gather(strategy, inputs.into_iter().enumerate()))
}

/// Present with the first input to settle present; absent when all are.
pub fn any<T, I>(options: I) -> AsyncOption<T>
where
    T: Payload,
    I: IntoIterator,
    I::Item: IntoDeferred<Output = Option<T>>,
{
    let inputs = options
        .into_iter()
        .map(IntoDeferred::into_deferred)
        .enumerate();

    AsyncOption::new(gather(AnyOption::default(), inputs))
}

/// Keyed [`all`]. Lazy fields are invoked during this call, in order.
pub fn extract<K, T, D, I>(fields: I) -> AsyncOption<HashMap<K, T>>
where
    K: Payload + Eq + Hash,
    T: Payload,
    D: IntoDeferred<Output = Option<T>>,
    I: IntoIterator<Item = (K, Field<D>)>,
{
    let inputs = fields
        .into_iter()
        .map(|(key, field)| (key, field.resolve().into_deferred()));

    AsyncOption::new(gather(ExtractOptions::default(), inputs))
}

/// Runs `factory`; a panic makes the result absent.
pub fn handle<T, F>(factory: F) -> AsyncOption<T>
where
    T: Payload,
    F: FnOnce() -> T,
{
    AsyncOption::new(core_algebra::option::handle(factory))
}

/// Like [`handle`], but for a factory returning a future. A panic in the
/// factory or while the future runs makes the result absent.
pub fn handle_async<T, Fut, F>(factory: F) -> AsyncOption<T>
where
    T: Payload,
    Fut: Future<Output = T> + Send + 'static,
    F: FnOnce() -> Fut,
{
    match catch_unwind(AssertUnwindSafe(factory)) {
        Ok(future) => {
            AsyncOption::from_future(AssertUnwindSafe(future).catch_unwind().map(Result::ok))
        }
        Err(_) => AsyncOption::none(),
    }
}
