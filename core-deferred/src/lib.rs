//! Deferred presence and outcome containers.
//!
//! [`AsyncOption`] and [`AsyncResult`] wrap a future of an `Option`/`Result`
//! and expose the same chaining operations as the settled containers, so
//! callers never unwrap and rewrap by hand. The `option` and `result` modules
//! provide the `all`/`any`/`extract` combinators that join or race many
//! deferred containers into one; `iteration` provides interruptible loops
//! over deferred callbacks.
//!
//! Settlement happens exactly once. Aggregates settle as soon as their
//! outcome is decided; inputs still in flight keep running to completion but
//! can no longer affect the result.
//!
//! # Examples
//!
//! ```rust
//! use core_deferred::{AsyncOption, ToAsync};
//!
//! # core_async::runtime::block_on(async {
//! let greeting = AsyncOption::from_future(async { Some("world") })
//!     .map(|name| format!("hello {name}"))
//!     .to_result(|| "nobody to greet");
//!
//! assert_eq!(greeting.await, Ok("hello world".to_string()));
//!
//! let missing = None::<i32>.to_async().otherwise(|| 0);
//! assert_eq!(missing.await, Some(0));
//! # });
//! ```

mod async_option;
mod async_result;
mod combinator;
mod condition;

pub mod deferred;
pub mod iteration;
pub mod option;
pub mod result;

pub use async_option::AsyncOption;
pub use async_result::AsyncResult;
pub use core_algebra::Field;
pub use deferred::{continue_with, is_deferred, pipe, to_future};
pub use deferred::{Deferred, IntoDeferred, Payload, SharedFuture};

/// Lifts a settled container into its deferred wrapper.
pub trait ToAsync {
    type Async;

    fn to_async(self) -> Self::Async;
}
