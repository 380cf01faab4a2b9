//! Synchronous presence and outcome algebra.
//!
//! Rust already ships the two tagged unions this workspace is built on:
//! `Option<T>` (presence) and `Result<T, E>` (outcome). This crate adds the
//! operations the deferred layer (`core-deferred`) consumes on top of them:
//!
//! - `option`: [`OptionExt`] plus the `all`/`any`/`extract`/`handle` helpers
//!   over immediate presence containers
//! - `result`: [`ResultExt`], [`Measured`] and the outcome-flavored helpers
//! - `iteration`: loop [`Signal`](iteration::Signal) normalization and the
//!   interruptible `array`/`for_each`/`map` drivers
//! - `parsers`: strict numeric string parsing
//!
//! # Examples
//!
//! ```rust
//! use core_algebra::{OptionExt, ResultExt};
//!
//! let present = Some(3);
//! assert!(present.has_value());
//! assert_eq!(present.to_result(|| "missing"), Ok(3));
//!
//! let failed: Result<i32, &str> = Err("boom");
//! assert!(failed.try_value().is_err());
//! assert_eq!(failed.swap(), Ok("boom"));
//! ```

pub mod error;
pub mod field;
pub mod iteration;
pub mod option;
pub mod parsers;
pub mod result;

pub use error::{Panicked, ValueNotProvided};
pub use field::Field;
pub use option::OptionExt;
pub use result::{Measured, ResultExt};
