//! Runtime-agnostic async shim.
//!
//! Every other crate in the workspace goes through this one for spawning,
//! timers and runtime construction, so Tokio stays an implementation detail
//! that can be swapped in one place.
//!
//! # Modules
//!
//! - `runtime`: `block_on` entry points, the shared background runtime and
//!   the runtime builder re-exports
//! - `task`: spawning, fire-and-forget detaching, cooperative yielding
//! - `time`: sleeping and instants
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! core_async::runtime::block_on(async {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(1)).await;
//!         42
//!     });
//!
//!     assert_eq!(handle.await.unwrap(), 42);
//! });
//! ```

// Re-export the async entry-point/test macros so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::{main, test};

pub mod runtime;
pub mod task;
pub mod time;

pub use task::{detach, spawn};
pub use time::{sleep, Duration, Instant};
