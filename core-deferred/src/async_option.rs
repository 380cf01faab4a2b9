//! Deferred presence container.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::sync::OnceLock;

use core_algebra::{OptionExt, ValueNotProvided};
use futures::future::{self, BoxFuture, FutureExt};

use crate::async_result::AsyncResult;
use crate::condition;
use crate::deferred::{Deferred, IntoDeferred, Payload, SharedFuture};
use crate::ToAsync;

/// A presence container that may not have settled yet.
///
/// Every chaining operation consumes the wrapper and returns a new one. When
/// the underlying container is already settled the callback runs right away;
/// otherwise it runs as a continuation once the container settles. Callbacks
/// on the branch that is not taken are never invoked.
///
/// Awaiting the wrapper yields the settled `Option<T>`.
pub struct AsyncOption<T: Payload> {
    option: SharedFuture<Option<T>>,
    value: OnceLock<SharedFuture<Result<T, ValueNotProvided>>>,
    has_value: OnceLock<SharedFuture<bool>>,
}

impl<T: Payload> AsyncOption<T> {
    pub fn new<S>(source: S) -> Self
    where
        S: IntoDeferred<Output = Option<T>>,
    {
        match source.into_deferred() {
            Deferred::Ready(option) => {
                let option = future::ready(option).boxed().shared();
                // Drive the ready future once so `peek` sees the value.
                let _ = option.clone().now_or_never();
                Self::from_shared(option)
            }
            Deferred::Pending(future) => Self::from_shared(future.shared()),
        }
    }

    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Option<T>> + Send + 'static,
    {
        Self::from_shared(future.boxed().shared())
    }

    pub fn some(value: T) -> Self {
        Self::new(Some(value))
    }

    pub fn none() -> Self {
        Self::new(None)
    }

    fn from_shared(option: SharedFuture<Option<T>>) -> Self {
        Self {
            option,
            value: OnceLock::new(),
            has_value: OnceLock::new(),
        }
    }

    /// The settled container, if it is already available.
    pub fn settled(&self) -> Option<Option<T>> {
        self.option.peek().cloned()
    }

    /// Resolves to the value, or [`ValueNotProvided`] when absent.
    ///
    /// Memoized: every call on the same instance returns the same future.
    pub fn value(&self) -> SharedFuture<Result<T, ValueNotProvided>> {
        self.value
            .get_or_init(|| {
                let option = self.option.clone();
                async move { option.await.try_value() }.boxed().shared()
            })
            .clone()
    }

    pub fn has_value(&self) -> SharedFuture<bool> {
        self.has_value
            .get_or_init(|| {
                let option = self.option.clone();
                async move { option.await.has_value() }.boxed().shared()
            })
            .clone()
    }

    /// The settled container itself.
    pub fn measured(&self) -> SharedFuture<Option<T>> {
        self.option.clone()
    }

    fn then<U, R, F>(self, callback: F) -> AsyncOption<U>
    where
        U: Payload,
        F: FnOnce(Option<T>) -> R + Send + 'static,
        R: IntoDeferred<Output = Option<U>>,
    {
        AsyncOption::new(self.into_deferred().continue_with(callback))
    }

    pub fn on_some<R, F>(self, callback: F) -> Self
    where
        F: FnOnce(&T) -> R + Send + 'static,
        R: IntoDeferred<Output = ()>,
    {
        self.then(move |option| match option.as_ref().map(callback) {
            Some(effect) => effect.into_deferred().map(move |()| option),
            None => Deferred::Ready(option),
        })
    }

    pub fn on_none<R, F>(self, callback: F) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
        R: IntoDeferred<Output = ()>,
    {
        self.then(move |option| match option {
            Some(value) => Deferred::Ready(Some(value)),
            None => callback().into_deferred().map(|()| None),
        })
    }

    pub fn on_both<R, F>(self, callback: F) -> Self
    where
        F: FnOnce(Option<&T>) -> R + Send + 'static,
        R: IntoDeferred<Output = ()>,
    {
        self.then(move |option| {
            callback(option.as_ref())
                .into_deferred()
                .map(move |()| option)
        })
    }

    pub fn bind<U, R, F>(self, binder: F) -> AsyncOption<U>
    where
        U: Payload,
        F: FnOnce(T) -> R + Send + 'static,
        R: IntoDeferred<Output = Option<U>>,
    {
        self.then(move |option| match option {
            Some(value) => binder(value).into_deferred(),
            None => Deferred::Ready(None),
        })
    }

    pub fn map<U, F>(self, mapper: F) -> AsyncOption<U>
    where
        U: Payload,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.then(move |option| option.map(mapper))
    }

    pub fn map_async<U, Fut, F>(self, mapper: F) -> AsyncOption<U>
    where
        U: Payload,
        Fut: Future<Output = U> + Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
    {
        self.then(move |option| match option {
            Some(value) => Deferred::pending(mapper(value).map(Some)),
            None => Deferred::Ready(None),
        })
    }

    pub fn wrap_inside(self) -> AsyncOption<Option<T>> {
        self.then(|option| option.wrap_inside())
    }

    pub fn wrap_outside(self) -> AsyncOption<Option<T>> {
        self.then(|option| option.wrap_outside())
    }

    /// Falls back to another container when absent.
    pub fn or<R, F>(self, factory: F) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
        R: IntoDeferred<Output = Option<T>>,
    {
        self.then(move |option| match option {
            Some(value) => Deferred::Ready(Some(value)),
            None => factory().into_deferred(),
        })
    }

    /// When absent and every predicate passes, fills in `factory()`.
    ///
    /// Predicates run in order and an immediate `false` stops the walk. Once
    /// any predicate is deferred, all deferred predicates are awaited and
    /// ANDed instead of stopping at the first deferred `false`.
    pub fn else_if<C, P, R, V, F>(self, conditions: C, factory: F) -> Self
    where
        C: IntoIterator<Item = P> + Send + 'static,
        P: FnOnce() -> R,
        R: IntoDeferred<Output = bool>,
        V: Into<Deferred<T>>,
        F: FnOnce() -> V + Send + 'static,
    {
        self.then(move |option| match option {
            Some(value) => Deferred::Ready(Some(value)),
            None => condition::evaluate(
                conditions
                    .into_iter()
                    .map(|predicate| predicate().into_deferred()),
            )
            .continue_with(move |passed| {
                if passed {
                    let value: Deferred<T> = factory().into();
                    value.map(Some)
                } else {
                    Deferred::Ready(None)
                }
            }),
        })
    }

    /// Fills in `factory()` when absent. (`else` is reserved.)
    pub fn otherwise<V, F>(self, factory: F) -> Self
    where
        V: Into<Deferred<T>>,
        F: FnOnce() -> V + Send + 'static,
    {
        self.then(move |option| match option {
            Some(value) => Deferred::Ready(Some(value)),
            None => {
                let value: Deferred<T> = factory().into();
                value.map(Some)
            }
        })
    }

    pub fn filter<R, F>(self, predicate: F) -> Self
    where
        F: FnOnce(&T) -> R + Send + 'static,
        R: IntoDeferred<Output = bool>,
    {
        self.then(move |option| match option {
            Some(value) => predicate(&value)
                .into_deferred()
                .map(move |keep| keep.then_some(value)),
            None => Deferred::Ready(None),
        })
    }

    /// Resolves to the value, or to `error_factory()` when absent.
    pub fn get<X, F>(self, error_factory: F) -> BoxFuture<'static, Result<T, X>>
    where
        X: Send + 'static,
        F: FnOnce() -> X + Send + 'static,
    {
        let option = self.option;
        async move { option.await.ok_or_else(error_factory) }.boxed()
    }

    pub fn to_result<E, F>(self, error_factory: F) -> AsyncResult<T, E>
    where
        E: Payload,
        F: FnOnce() -> E + Send + 'static,
    {
        AsyncResult::new(
            self.into_deferred()
                .map(move |option| option.to_result(error_factory)),
        )
    }
}

impl<T: Payload> IntoDeferred for AsyncOption<T> {
    type Output = Option<T>;

    fn into_deferred(self) -> Deferred<Option<T>> {
        if let Some(option) = self.option.peek().cloned() {
            return Deferred::Ready(option);
        }
        Deferred::Pending(self.option.boxed())
    }
}

impl<T: Payload> IntoFuture for AsyncOption<T> {
    type Output = Option<T>;
    type IntoFuture = SharedFuture<Option<T>>;

    fn into_future(self) -> Self::IntoFuture {
        self.option
    }
}

impl<T: Payload> Clone for AsyncOption<T> {
    /// Clones share the settlement, not the memoized projections.
    fn clone(&self) -> Self {
        Self::from_shared(self.option.clone())
    }
}

impl<T: Payload> From<Option<T>> for AsyncOption<T> {
    fn from(option: Option<T>) -> Self {
        Self::new(option)
    }
}

impl<T: Payload> ToAsync for Option<T> {
    type Async = AsyncOption<T>;

    fn to_async(self) -> AsyncOption<T> {
        AsyncOption::new(self)
    }
}

impl<T: Payload + fmt::Debug> fmt::Debug for AsyncOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOption")
            .field("settled", &self.option.peek())
            .finish_non_exhaustive()
    }
}
