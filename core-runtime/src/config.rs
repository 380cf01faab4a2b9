//! # Runtime Configuration
//!
//! Describes the Tokio scheduler the deferred containers run on, plus the
//! logging setup that goes with it.
//!
//! ## Overview
//!
//! The containers are scheduler-agnostic: on a current-thread runtime every
//! continuation interleaves cooperatively, on a multi-thread runtime they may
//! run in parallel and rely on the settle-once latch. `RuntimeConfig` picks
//! one of the two. The builder validates eagerly so that a bad combination
//! fails at `build()` instead of at runtime start.
//!
//! ## Usage
//!
//! ```no_run
//! use core_runtime::config::{RuntimeConfig, SchedulerFlavor};
//!
//! let config = RuntimeConfig::builder()
//!     .flavor(SchedulerFlavor::MultiThread)
//!     .worker_threads(4)
//!     .thread_name("algebra-worker")
//!     .build()
//!     .expect("valid runtime config");
//!
//! let runtime = config.build_runtime().expect("runtime");
//! runtime.block_on(async { /* ... */ });
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::RuntimeConfig;
//!
//! // Worker threads only make sense for the multi-thread scheduler
//! let config = RuntimeConfig::builder()
//!     .worker_threads(4)
//!     .build()
//!     .expect("Should fail - current-thread runtime with workers");
//! ```

use std::env;
use std::str::FromStr;

use core_async::runtime::{Builder, Runtime};
use tracing::debug;

use crate::error::{Error, Result};
use crate::logging::{LogLevel, LoggingConfig};

/// Selects the scheduler flavor through the environment.
pub const FLAVOR_ENV: &str = "ALGEBRA_RUNTIME_FLAVOR";
/// Worker count for the multi-thread scheduler.
pub const WORKER_THREADS_ENV: &str = "ALGEBRA_WORKER_THREADS";
/// Enables logging at the given level.
pub const LOG_LEVEL_ENV: &str = "ALGEBRA_LOG_LEVEL";

const DEFAULT_THREAD_NAME: &str = "algebra-runtime";
const MAX_WORKER_THREADS: usize = 1024;

/// Which Tokio scheduler drives the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerFlavor {
    /// Single-threaded cooperative scheduler
    #[default]
    CurrentThread,
    /// Work-stealing scheduler over a worker pool
    MultiThread,
}

impl FromStr for SchedulerFlavor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "current_thread" | "current" => Ok(SchedulerFlavor::CurrentThread),
            "multi_thread" | "multi" => Ok(SchedulerFlavor::MultiThread),
            other => Err(Error::Config(format!(
                "Unknown scheduler flavor '{other}'. Expected 'current_thread' or 'multi_thread'."
            ))),
        }
    }
}

/// Runtime configuration for hosts of the deferred containers.
///
/// Use [`RuntimeConfigBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Scheduler flavor
    pub flavor: SchedulerFlavor,

    /// Worker pool size; `None` lets Tokio pick one per core.
    /// Only valid for [`SchedulerFlavor::MultiThread`].
    pub worker_threads: Option<usize>,

    /// Name given to runtime threads
    pub thread_name: String,

    /// Logging to install alongside the runtime, if any
    pub logging: Option<LoggingConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            flavor: SchedulerFlavor::default(),
            worker_threads: None,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            logging: None,
        }
    }
}

impl RuntimeConfig {
    /// Creates a new builder for constructing a `RuntimeConfig`.
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    /// Reads the configuration from `ALGEBRA_RUNTIME_FLAVOR`,
    /// `ALGEBRA_WORKER_THREADS` and `ALGEBRA_LOG_LEVEL`. Unset variables keep
    /// their defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(flavor) = lookup(FLAVOR_ENV) {
            builder = builder.flavor(flavor.parse()?);
        }

        if let Some(threads) = lookup(WORKER_THREADS_ENV) {
            let threads = threads.trim().parse::<usize>().map_err(|e| {
                Error::Config(format!("{WORKER_THREADS_ENV} must be a positive integer: {e}"))
            })?;
            builder = builder.worker_threads(threads);
        }

        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            let level: LogLevel = level.parse()?;
            builder = builder.logging(LoggingConfig::default().with_level(level));
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Worker threads are only set for the multi-thread scheduler
    /// - Worker threads are within `1..=1024`
    /// - Thread name is not empty
    pub fn validate(&self) -> Result<()> {
        if let Some(threads) = self.worker_threads {
            if self.flavor == SchedulerFlavor::CurrentThread {
                return Err(Error::Config(
                    "Worker threads are only valid for the multi-thread scheduler. \
                     Use .flavor(SchedulerFlavor::MultiThread) or drop .worker_threads()."
                        .to_string(),
                ));
            }

            if threads == 0 {
                return Err(Error::Config(
                    "Worker threads must be greater than 0".to_string(),
                ));
            }

            if threads > MAX_WORKER_THREADS {
                return Err(Error::Config(format!(
                    "Worker threads exceed maximum of {MAX_WORKER_THREADS}"
                )));
            }
        }

        if self.thread_name.trim().is_empty() {
            return Err(Error::Config("Thread name cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Builds a Tokio runtime with timers and I/O enabled.
    pub fn build_runtime(&self) -> Result<Runtime> {
        let mut builder = match self.flavor {
            SchedulerFlavor::CurrentThread => Builder::new_current_thread(),
            SchedulerFlavor::MultiThread => Builder::new_multi_thread(),
        };

        if let Some(threads) = self.worker_threads {
            builder.worker_threads(threads);
        }

        let runtime = builder
            .thread_name(self.thread_name.clone())
            .enable_all()
            .build()
            .map_err(|e| Error::Runtime(format!("Failed to build runtime: {}", e)))?;

        debug!(
            flavor = ?self.flavor,
            worker_threads = ?self.worker_threads,
            "runtime built"
        );

        Ok(runtime)
    }
}

/// Builder for [`RuntimeConfig`].
#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    flavor: Option<SchedulerFlavor>,
    worker_threads: Option<usize>,
    thread_name: Option<String>,
    logging: Option<LoggingConfig>,
}

impl RuntimeConfigBuilder {
    /// Sets the scheduler flavor. Defaults to current-thread.
    pub fn flavor(mut self, flavor: SchedulerFlavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    /// Sets the worker pool size for the multi-thread scheduler.
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// Attaches a logging configuration for the host to install.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Builds the final `RuntimeConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with an actionable message when the
    /// combination is invalid; see [`RuntimeConfig::validate`].
    pub fn build(self) -> Result<RuntimeConfig> {
        let config = RuntimeConfig {
            flavor: self.flavor.unwrap_or_default(),
            worker_threads: self.worker_threads,
            thread_name: self
                .thread_name
                .unwrap_or_else(|| DEFAULT_THREAD_NAME.to_string()),
            logging: self.logging,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = RuntimeConfig::builder().build().unwrap();

        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.flavor, SchedulerFlavor::CurrentThread);
        assert_eq!(config.thread_name, "algebra-runtime");
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_builder_rejects_workers_on_current_thread() {
        let result = RuntimeConfig::builder().worker_threads(2).build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("only valid for the multi-thread scheduler"));
    }

    #[test]
    fn test_builder_rejects_zero_workers() {
        let result = RuntimeConfig::builder()
            .flavor(SchedulerFlavor::MultiThread)
            .worker_threads(0)
            .build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("greater than 0"));
    }

    #[test]
    fn test_builder_rejects_empty_thread_name() {
        let result = RuntimeConfig::builder().thread_name("  ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_flavor_parsing() {
        assert_eq!(
            "multi-thread".parse::<SchedulerFlavor>().unwrap(),
            SchedulerFlavor::MultiThread
        );
        assert_eq!(
            "Current_Thread".parse::<SchedulerFlavor>().unwrap(),
            SchedulerFlavor::CurrentThread
        );
        assert!("fibers".parse::<SchedulerFlavor>().is_err());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            (FLAVOR_ENV, "multi_thread"),
            (WORKER_THREADS_ENV, "3"),
            (LOG_LEVEL_ENV, "trace"),
        ]))
        .unwrap();

        assert_eq!(config.flavor, SchedulerFlavor::MultiThread);
        assert_eq!(config.worker_threads, Some(3));
        assert_eq!(config.logging.map(|l| l.level), Some(LogLevel::Trace));
    }

    #[test]
    fn test_from_lookup_with_nothing_set() {
        let config = RuntimeConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_malformed_worker_count() {
        let result = RuntimeConfig::from_lookup(lookup_from(&[
            (FLAVOR_ENV, "multi_thread"),
            (WORKER_THREADS_ENV, "many"),
        ]));

        assert!(result
            .unwrap_err()
            .to_string()
            .contains(WORKER_THREADS_ENV));
    }

    #[test]
    fn test_build_current_thread_runtime() {
        let runtime = RuntimeConfig::default().build_runtime().unwrap();
        assert_eq!(runtime.block_on(async { 40 + 2 }), 42);
    }

    #[test]
    fn test_build_multi_thread_runtime() {
        let config = RuntimeConfig::builder()
            .flavor(SchedulerFlavor::MultiThread)
            .worker_threads(2)
            .build()
            .unwrap();

        let runtime = config.build_runtime().unwrap();
        let flavor = runtime.block_on(async {
            core_async::runtime::Handle::current().runtime_flavor()
        });

        assert_eq!(flavor, core_async::runtime::RuntimeFlavor::MultiThread);
    }
}
