//! Time-related abstractions.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!
//!     sleep(Duration::from_millis(10)).await;
//!
//!     assert!(start.elapsed() >= Duration::from_millis(10));
//! }
//! ```

pub use std::time::{Duration, Instant};
pub use tokio::time::{sleep, Sleep};
