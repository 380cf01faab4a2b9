//! Values that may or may not be available yet.
//!
//! [`Deferred`] is the single currency every operation in this crate accepts:
//! callbacks may return a plain container, a boxed future, or one of the
//! wrappers, and [`IntoDeferred`] folds all of those onto `Ready`/`Pending`.
//! Chaining with [`Deferred::continue_with`] stays synchronous as long as
//! every step is `Ready`; nothing is scheduled until a step is `Pending`.

use std::fmt;
use std::future::{Future, IntoFuture};

use core_algebra::iteration::{InterruptSignal, LoopResult, Signal};
use futures::future::{self, BoxFuture, FutureExt, Shared};

/// Settled values are handed out to every reader of a wrapper, so wrapper
/// payloads must be cloneable and shareable across threads.
pub trait Payload: Clone + Send + Sync + 'static {}

impl<T> Payload for T where T: Clone + Send + Sync + 'static {}

/// A boxed future that can be awaited from many places.
pub type SharedFuture<T> = Shared<BoxFuture<'static, T>>;

/// A value, or a value not yet available.
pub enum Deferred<T> {
    Ready(T),
    Pending(BoxFuture<'static, T>),
}

impl<T: Send + 'static> Deferred<T> {
    pub fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::Pending(future.boxed())
    }

    /// True only for values that are still being computed.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Applies `mapper`. A ready input runs it immediately; a pending one runs
    /// it as a continuation. Whatever the mapper returns is flattened.
    pub fn continue_with<R, F>(self, mapper: F) -> Deferred<R::Output>
    where
        F: FnOnce(T) -> R + Send + 'static,
        R: IntoDeferred,
    {
        match self {
            Self::Ready(value) => mapper(value).into_deferred(),
            Self::Pending(future) => Deferred::Pending(
                async move { mapper(future.await).into_deferred().await }.boxed(),
            ),
        }
    }

    /// Applies a plain mapper without flattening.
    pub fn map<U, F>(self, mapper: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        match self {
            Self::Ready(value) => Deferred::Ready(mapper(value)),
            Self::Pending(future) => Deferred::Pending(future.map(mapper).boxed()),
        }
    }

    /// Returns the value if it is already available.
    pub fn into_ready(self) -> Result<T, Self> {
        match self {
            Self::Ready(value) => Ok(value),
            pending => Err(pending),
        }
    }
}

impl<T> From<T> for Deferred<T> {
    fn from(value: T) -> Self {
        Self::Ready(value)
    }
}

impl<T: Send + 'static> IntoFuture for Deferred<T> {
    type Output = T;
    type IntoFuture = BoxFuture<'static, T>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Self::Ready(value) => future::ready(value).boxed(),
            Self::Pending(future) => future,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Anything that can stand in for a possibly-deferred value.
pub trait IntoDeferred {
    type Output: Send + 'static;

    fn into_deferred(self) -> Deferred<Self::Output>;
}

impl<T: Send + 'static> IntoDeferred for Deferred<T> {
    type Output = T;

    fn into_deferred(self) -> Deferred<T> {
        self
    }
}

impl<T: Send + 'static> IntoDeferred for BoxFuture<'static, T> {
    type Output = T;

    fn into_deferred(self) -> Deferred<T> {
        Deferred::Pending(self)
    }
}

impl<T: Send + 'static> IntoDeferred for Option<T> {
    type Output = Option<T>;

    fn into_deferred(self) -> Deferred<Self::Output> {
        Deferred::Ready(self)
    }
}

impl<T: Send + 'static, E: Send + 'static> IntoDeferred for Result<T, E> {
    type Output = Result<T, E>;

    fn into_deferred(self) -> Deferred<Self::Output> {
        Deferred::Ready(self)
    }
}

impl<T: Send + 'static> IntoDeferred for LoopResult<T> {
    type Output = LoopResult<T>;

    fn into_deferred(self) -> Deferred<Self::Output> {
        Deferred::Ready(self)
    }
}

macro_rules! ready_into_deferred {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoDeferred for $ty {
                type Output = $ty;

                fn into_deferred(self) -> Deferred<$ty> {
                    Deferred::Ready(self)
                }
            }
        )*
    };
}

ready_into_deferred!(bool, (), Signal, InterruptSignal);

/// `x.is_deferred()` as a free function.
pub fn is_deferred<T: Send + 'static>(value: &Deferred<T>) -> bool {
    value.is_deferred()
}

/// Coerces anything deferred-like into a boxed future. Futures pass through
/// untouched; ready values become an already-resolved future.
pub fn to_future<D: IntoDeferred>(value: D) -> BoxFuture<'static, D::Output> {
    value.into_deferred().into_future()
}

/// Free-function form of [`Deferred::continue_with`]. Chain the returned
/// value to apply several mappers in sequence.
pub fn continue_with<D, R, F>(value: D, mapper: F) -> Deferred<R::Output>
where
    D: IntoDeferred,
    F: FnOnce(D::Output) -> R + Send + 'static,
    R: IntoDeferred,
{
    value.into_deferred().continue_with(mapper)
}

/// Composes two possibly-deferred mappers into one.
pub fn pipe<A, R1, R2, F, G>(first: F, second: G) -> impl FnOnce(A) -> Deferred<R2::Output>
where
    F: FnOnce(A) -> R1,
    R1: IntoDeferred,
    G: FnOnce(R1::Output) -> R2 + Send + 'static,
    R2: IntoDeferred,
{
    move |input| first(input).into_deferred().continue_with(second)
}
