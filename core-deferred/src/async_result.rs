//! Deferred outcome container.

use std::convert::Infallible;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::sync::OnceLock;

use core_algebra::{Measured, ResultExt, ValueNotProvided};
use futures::future::{self, BoxFuture, FutureExt};

use crate::async_option::AsyncOption;
use crate::condition;
use crate::deferred::{Deferred, IntoDeferred, Payload, SharedFuture};
use crate::ToAsync;

/// An outcome container that may not have settled yet.
///
/// Mirrors [`AsyncOption`]: operations consume the wrapper, run their callback
/// only on the branch they target, and pass the settled outcome through
/// otherwise.
pub struct AsyncResult<T: Payload, E: Payload> {
    result: SharedFuture<Result<T, E>>,
    value: OnceLock<SharedFuture<Result<T, ValueNotProvided>>>,
    error: OnceLock<SharedFuture<Result<E, ValueNotProvided>>>,
    is_succeeded: OnceLock<SharedFuture<bool>>,
    measured: OnceLock<SharedFuture<Measured<T, E>>>,
}

impl<T: Payload, E: Payload> AsyncResult<T, E> {
    pub fn new<S>(source: S) -> Self
    where
        S: IntoDeferred<Output = Result<T, E>>,
    {
        match source.into_deferred() {
            Deferred::Ready(result) => {
                let result = future::ready(result).boxed().shared();
                let _ = result.clone().now_or_never();
                Self::from_shared(result)
            }
            Deferred::Pending(future) => Self::from_shared(future.shared()),
        }
    }

    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::from_shared(future.boxed().shared())
    }

    pub fn success(value: T) -> Self {
        Self::new(Ok(value))
    }

    pub fn failure(error: E) -> Self {
        Self::new(Err(error))
    }

    fn from_shared(result: SharedFuture<Result<T, E>>) -> Self {
        Self {
            result,
            value: OnceLock::new(),
            error: OnceLock::new(),
            is_succeeded: OnceLock::new(),
            measured: OnceLock::new(),
        }
    }

    fn project<U, F>(&self, cell: &OnceLock<SharedFuture<U>>, projection: F) -> SharedFuture<U>
    where
        U: Payload,
        F: FnOnce(Result<T, E>) -> U + Send + 'static,
    {
        cell.get_or_init(|| self.result.clone().map(projection).boxed().shared())
            .clone()
    }

    /// The settled container, if it is already available.
    pub fn settled(&self) -> Option<Result<T, E>> {
        self.result.peek().cloned()
    }

    /// Resolves to the success value, or [`ValueNotProvided`] on failure.
    /// Memoized like every projection below.
    pub fn value(&self) -> SharedFuture<Result<T, ValueNotProvided>> {
        self.project(&self.value, |result| result.try_value())
    }

    /// Resolves to the error, or [`ValueNotProvided`] on success.
    pub fn error(&self) -> SharedFuture<Result<E, ValueNotProvided>> {
        self.project(&self.error, |result| result.try_error())
    }

    pub fn is_succeeded(&self) -> SharedFuture<bool> {
        self.project(&self.is_succeeded, |result| result.is_succeeded())
    }

    pub fn measured(&self) -> SharedFuture<Measured<T, E>> {
        self.project(&self.measured, |result| result.measured())
    }

    fn then<T1, E1, R, F>(self, callback: F) -> AsyncResult<T1, E1>
    where
        T1: Payload,
        E1: Payload,
        F: FnOnce(Result<T, E>) -> R + Send + 'static,
        R: IntoDeferred<Output = Result<T1, E1>>,
    {
        AsyncResult::new(self.into_deferred().continue_with(callback))
    }

    pub fn on_success<R, F>(self, callback: F) -> Self
    where
        F: FnOnce(&T) -> R + Send + 'static,
        R: IntoDeferred<Output = ()>,
    {
        self.then(move |result| match result.as_ref().ok().map(callback) {
            Some(effect) => effect.into_deferred().map(move |()| result),
            None => Deferred::Ready(result),
        })
    }

    pub fn on_failure<R, F>(self, callback: F) -> Self
    where
        F: FnOnce(&E) -> R + Send + 'static,
        R: IntoDeferred<Output = ()>,
    {
        self.then(move |result| match result.as_ref().err().map(callback) {
            Some(effect) => effect.into_deferred().map(move |()| result),
            None => Deferred::Ready(result),
        })
    }

    pub fn on_both<R, F>(self, callback: F) -> Self
    where
        F: FnOnce(Result<&T, &E>) -> R + Send + 'static,
        R: IntoDeferred<Output = ()>,
    {
        self.then(move |result| {
            callback(result.as_ref())
                .into_deferred()
                .map(move |()| result)
        })
    }

    pub fn swap(self) -> AsyncResult<E, T> {
        self.then(|result| result.swap())
    }

    pub fn bind<U, R, F>(self, binder: F) -> AsyncResult<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> R + Send + 'static,
        R: IntoDeferred<Output = Result<U, E>>,
    {
        self.then(move |result| match result {
            Ok(value) => binder(value).into_deferred(),
            Err(error) => Deferred::Ready(Err(error)),
        })
    }

    pub fn bind_error<E1, R, F>(self, binder: F) -> AsyncResult<T, E1>
    where
        E1: Payload,
        F: FnOnce(E) -> R + Send + 'static,
        R: IntoDeferred<Output = Result<T, E1>>,
    {
        self.then(move |result| match result {
            Ok(value) => Deferred::Ready(Ok(value)),
            Err(error) => binder(error).into_deferred(),
        })
    }

    pub fn map<U, F>(self, mapper: F) -> AsyncResult<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.then(move |result| result.map(mapper))
    }

    pub fn map_async<U, Fut, F>(self, mapper: F) -> AsyncResult<U, E>
    where
        U: Payload,
        Fut: Future<Output = U> + Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
    {
        self.then(move |result| match result {
            Ok(value) => Deferred::pending(mapper(value).map(Ok)),
            Err(error) => Deferred::Ready(Err(error)),
        })
    }

    pub fn map_error<E1, F>(self, mapper: F) -> AsyncResult<T, E1>
    where
        E1: Payload,
        F: FnOnce(E) -> E1 + Send + 'static,
    {
        self.then(move |result| result.map_err(mapper))
    }

    pub fn map_error_async<E1, Fut, F>(self, mapper: F) -> AsyncResult<T, E1>
    where
        E1: Payload,
        Fut: Future<Output = E1> + Send + 'static,
        F: FnOnce(E) -> Fut + Send + 'static,
    {
        self.then(move |result| match result {
            Ok(value) => Deferred::Ready(Ok(value)),
            Err(error) => Deferred::pending(mapper(error).map(Err)),
        })
    }

    /// Replaces a failure with whatever `factory(error)` produces.
    pub fn or<E1, R, F>(self, factory: F) -> AsyncResult<T, E1>
    where
        E1: Payload,
        F: FnOnce(E) -> R + Send + 'static,
        R: IntoDeferred<Output = Result<T, E1>>,
    {
        self.bind_error(factory)
    }

    /// Recovers from a failure with `factory(error)` when every predicate
    /// passes. Predicate evaluation follows [`AsyncOption::else_if`].
    pub fn else_if<C, P, R, V, F>(self, conditions: C, factory: F) -> Self
    where
        C: IntoIterator<Item = P> + Send + 'static,
        P: FnOnce(&E) -> R,
        R: IntoDeferred<Output = bool>,
        V: Into<Deferred<T>>,
        F: FnOnce(E) -> V + Send + 'static,
    {
        self.then(move |result| match result {
            Ok(value) => Deferred::Ready(Ok(value)),
            Err(error) => condition::evaluate(
                conditions
                    .into_iter()
                    .map(|predicate| predicate(&error).into_deferred()),
            )
            .continue_with(move |passed| {
                if passed {
                    let value: Deferred<T> = factory(error).into();
                    value.map(Ok)
                } else {
                    Deferred::Ready(Err(error))
                }
            }),
        })
    }

    /// Recovers from any failure. (`else` is reserved.)
    pub fn otherwise<V, F>(self, factory: F) -> AsyncResult<T, Infallible>
    where
        V: Into<Deferred<T>>,
        F: FnOnce(E) -> V + Send + 'static,
    {
        self.then(move |result| match result {
            Ok(value) => Deferred::Ready(Ok(value)),
            Err(error) => {
                let value: Deferred<T> = factory(error).into();
                value.map(Ok)
            }
        })
    }

    /// Fails a success when `condition` produces an error for it.
    pub fn filter<R, F>(self, condition: F) -> Self
    where
        F: FnOnce(&T) -> R + Send + 'static,
        R: IntoDeferred<Output = Option<E>>,
    {
        self.then(move |result| match result {
            Ok(value) => condition(&value)
                .into_deferred()
                .map(move |rejection| Ok(value).filter(|_| rejection)),
            failed => Deferred::Ready(failed),
        })
    }

    /// Recovers a failure when `condition` produces a value for it.
    pub fn filter_error<R, F>(self, condition: F) -> Self
    where
        F: FnOnce(&E) -> R + Send + 'static,
        R: IntoDeferred<Output = Option<T>>,
    {
        self.then(move |result| match result {
            Err(error) => condition(&error)
                .into_deferred()
                .map(move |recovered| Err(error).filter_error(|_| recovered)),
            succeeded => Deferred::Ready(succeeded),
        })
    }

    /// Resolves to the value, or to `error_factory(error)` on failure.
    pub fn get<X, F>(self, error_factory: F) -> BoxFuture<'static, Result<T, X>>
    where
        X: Send + 'static,
        F: FnOnce(E) -> X + Send + 'static,
    {
        let result = self.result;
        async move { result.await.map_err(error_factory) }.boxed()
    }

    /// Resolves to the error, or to `error_factory(value)` on success.
    pub fn get_error<X, F>(self, error_factory: F) -> BoxFuture<'static, Result<E, X>>
    where
        X: Send + 'static,
        F: FnOnce(T) -> X + Send + 'static,
    {
        let result = self.result;
        async move { result.await.swap().map_err(error_factory) }.boxed()
    }

    pub fn to_option(self) -> AsyncOption<T> {
        AsyncOption::new(self.into_deferred().map(|result| result.to_option()))
    }
}

impl<T: Payload, E: Payload> IntoDeferred for AsyncResult<T, E> {
    type Output = Result<T, E>;

    fn into_deferred(self) -> Deferred<Result<T, E>> {
        if let Some(result) = self.result.peek().cloned() {
            return Deferred::Ready(result);
        }
        Deferred::Pending(self.result.boxed())
    }
}

impl<T: Payload, E: Payload> IntoFuture for AsyncResult<T, E> {
    type Output = Result<T, E>;
    type IntoFuture = SharedFuture<Result<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.result
    }
}

impl<T: Payload, E: Payload> Clone for AsyncResult<T, E> {
    fn clone(&self) -> Self {
        Self::from_shared(self.result.clone())
    }
}

impl<T: Payload, E: Payload> From<Result<T, E>> for AsyncResult<T, E> {
    fn from(result: Result<T, E>) -> Self {
        Self::new(result)
    }
}

impl<T: Payload, E: Payload> ToAsync for Result<T, E> {
    type Async = AsyncResult<T, E>;

    fn to_async(self) -> AsyncResult<T, E> {
        AsyncResult::new(self)
    }
}

impl<T, E> fmt::Debug for AsyncResult<T, E>
where
    T: Payload + fmt::Debug,
    E: Payload + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncResult")
            .field("settled", &self.result.peek())
            .finish_non_exhaustive()
    }
}
