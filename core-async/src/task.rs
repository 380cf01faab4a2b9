//! Task spawning and execution abstractions.
//!
//! `spawn` hands back a joinable handle; `detach` is fire-and-forget and is
//! what the combinators use to keep pending inputs running after the
//! aggregate has already settled.

use std::future::Future;

use tokio::runtime::Handle;
use tracing::trace;

pub use tokio::task::{yield_now, JoinError, JoinHandle};

/// Spawns a new asynchronous task on the current runtime.
///
/// # Panics
///
/// Panics when called outside a runtime context; see [`detach`] for a
/// variant that does not.
///
/// # Examples
///
/// ```rust
/// use core_async::task::spawn;
///
/// # core_async::runtime::block_on(async {
/// let handle = spawn(async { 42 });
/// assert_eq!(handle.await.unwrap(), 42);
/// # });
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Runs `future` to completion in the background, dropping its output.
///
/// Inside a runtime context the future becomes a task on that runtime.
/// Outside one it becomes a task on [`runtime::background`], so callers never
/// need to know whether they were invoked from async code.
///
/// [`runtime::background`]: crate::runtime::background
pub fn detach<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            drop(handle.spawn(future));
        }
        Err(_) => {
            trace!("no runtime context, detaching onto the background runtime");
            drop(crate::runtime::background().spawn(future));
        }
    }
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
