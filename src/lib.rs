//! Workspace facade crate.
//!
//! Re-exports the synchronous algebra (`core-algebra`) and its deferred
//! counterpart (`core-deferred`) so host applications can depend on a single
//! crate. The `runtime` feature (on by default) additionally exposes the
//! logging and runtime configuration layer from `core-runtime`.

pub use core_algebra as algebra;
pub use core_deferred as deferred;

#[cfg(feature = "runtime")]
pub use core_runtime as runtime;

pub use core_algebra::{Measured, OptionExt, Panicked, ResultExt, ValueNotProvided};
pub use core_deferred::{AsyncOption, AsyncResult, Deferred, IntoDeferred, ToAsync};
