//! Runtime utilities that abstract over the underlying async executor.
//!
//! We wrap Tokio's runtime primitives so that downstream crates never need to
//! depend on Tokio directly.

use std::future::Future;
use std::sync::LazyLock;

pub use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

/// Worker thread name of the [`background`] runtime.
pub const BACKGROUND_THREAD_NAME: &str = "core-async-background";

static BACKGROUND: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name(BACKGROUND_THREAD_NAME)
        .enable_all()
        .build()
        .expect("core_async::runtime::background: failed to build Tokio runtime")
});

/// Runs the provided future to completion on a fresh current-thread runtime.
pub fn block_on<F>(future: F) -> F::Output
where
    F: Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}

/// Runs the provided future to completion on a fresh multi-thread runtime.
///
/// Continuations spawned while the future runs may execute on any of the
/// `worker_threads` workers.
pub fn block_on_multi_thread<F>(worker_threads: usize, future: F) -> F::Output
where
    F: Future,
{
    Builder::new_multi_thread()
        .worker_threads(worker_threads.max(1))
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on_multi_thread: failed to build Tokio runtime")
        .block_on(future)
}

/// Whether the caller is running inside a runtime context.
pub fn in_context() -> bool {
    Handle::try_current().is_ok()
}

/// Process-wide runtime with a single worker, built on first use.
///
/// Drives futures detached from code that is not running inside a runtime.
/// It lives until the process exits.
pub fn background() -> &'static Handle {
    BACKGROUND.handle()
}
