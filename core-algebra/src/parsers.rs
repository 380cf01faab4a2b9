//! Strict numeric parsing.
//!
//! Inputs must match the whole pattern: no surrounding whitespace, no
//! `inf`/`nan`, no hex or underscores.

use std::sync::LazyLock;

use regex::Regex;
use tracing::error;

pub const FLOAT_PATTERN: &str = r"(?i)^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:e[+-]?\d+)?$";
pub const INTEGER_PATTERN: &str = r"^[+-]?\d+$";

static FLOAT: LazyLock<Option<Regex>> = LazyLock::new(|| compile(FLOAT_PATTERN));
static INTEGER: LazyLock<Option<Regex>> = LazyLock::new(|| compile(INTEGER_PATTERN));

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .inspect_err(|err| error!(pattern, error = %err, "numeric pattern failed to compile"))
        .ok()
}

fn matches(pattern: &Option<Regex>, input: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(input))
}

pub fn float(input: &str) -> Option<f64> {
    Some(input)
        .filter(|input| matches(&FLOAT, input))
        .and_then(|input| input.parse().ok())
}

/// Parses a decimal integer. Values outside the `i64` range are `None`.
pub fn integer(input: &str) -> Option<i64> {
    Some(input)
        .filter(|input| matches(&INTEGER, input))
        .and_then(|input| input.parse().ok())
}
