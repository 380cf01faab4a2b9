//! # Core Runtime Module
//!
//! Ambient infrastructure for the deferred-container crates:
//! - Logging and tracing setup
//! - Runtime configuration
//!
//! ## Overview
//!
//! The container crates only emit `tracing` events and schedule work through
//! `core_async`. This crate decides where those events go and which Tokio
//! scheduler the work lands on.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{RuntimeConfig, RuntimeConfigBuilder, SchedulerFlavor};
pub use error::{Error, Result};
pub use logging::{init_logging, init_test_logging, LogFormat, LogLevel, LoggingConfig};
