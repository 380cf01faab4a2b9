//! Outcome container helpers.

use std::collections::HashMap;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::{Panicked, ValueNotProvided};
use crate::field::Field;

/// The value-or-error projection of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measured<T, E> {
    Value(T),
    Error(E),
}

impl<T, E> Measured<T, E> {
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn as_ref(&self) -> Measured<&T, &E> {
        match self {
            Self::Value(value) => Measured::Value(value),
            Self::Error(error) => Measured::Error(error),
        }
    }
}

impl<T> Measured<T, T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Value(inner) | Self::Error(inner) => inner,
        }
    }
}

impl<T, E> From<Result<T, E>> for Measured<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(error) => Self::Error(error),
        }
    }
}

/// Operations the deferred layer expects from an outcome container.
pub trait ResultExt<T, E>: Sized {
    fn is_succeeded(&self) -> bool;

    /// Reads the success value, failing with [`ValueNotProvided`] on `Err`.
    fn try_value(self) -> Result<T, ValueNotProvided>;

    /// Reads the error, failing with [`ValueNotProvided`] on `Ok`.
    fn try_error(self) -> Result<E, ValueNotProvided>;

    fn measured(self) -> Measured<T, E>;

    fn swap(self) -> Result<E, T>;

    fn to_option(self) -> Option<T>;

    /// Turns a success into a failure when `condition` produces an error.
    fn filter<F>(self, condition: F) -> Result<T, E>
    where
        F: FnOnce(&T) -> Option<E>;

    /// Turns a failure into a success when `condition` produces a value.
    fn filter_error<F>(self, condition: F) -> Result<T, E>
    where
        F: FnOnce(&E) -> Option<T>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn is_succeeded(&self) -> bool {
        self.is_ok()
    }

    fn try_value(self) -> Result<T, ValueNotProvided> {
        self.map_err(|_| ValueNotProvided::new())
    }

    fn try_error(self) -> Result<E, ValueNotProvided> {
        match self {
            Ok(_) => Err(ValueNotProvided::new()),
            Err(error) => Ok(error),
        }
    }

    fn measured(self) -> Measured<T, E> {
        Measured::from(self)
    }

    fn swap(self) -> Result<E, T> {
        match self {
            Ok(value) => Err(value),
            Err(error) => Ok(error),
        }
    }

    fn to_option(self) -> Option<T> {
        self.ok()
    }

    fn filter<F>(self, condition: F) -> Result<T, E>
    where
        F: FnOnce(&T) -> Option<E>,
    {
        match self {
            Ok(value) => match condition(&value) {
                Some(error) => Err(error),
                None => Ok(value),
            },
            failed => failed,
        }
    }

    fn filter_error<F>(self, condition: F) -> Result<T, E>
    where
        F: FnOnce(&E) -> Option<T>,
    {
        match self {
            Err(error) => match condition(&error) {
                Some(value) => Ok(value),
                None => Err(error),
            },
            succeeded => succeeded,
        }
    }
}

/// Succeeds when every input succeeds. Unlike the presence flavor this walks
/// every input and reports all errors, in input order.
pub fn all<T, E, I>(results: I) -> Result<Vec<T>, Vec<E>>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    let mut values = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

/// The first success in iteration order, or every error collected so far.
pub fn any<T, E, I>(results: I) -> Result<T, Vec<E>>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(value) => return Ok(value),
            Err(error) => errors.push(error),
        }
    }

    Err(errors)
}

/// Keyed [`all`]. Every field is resolved; on failure only the failing
/// fields appear in the error map.
pub fn extract<K, T, E, I>(fields: I) -> Result<HashMap<K, T>, HashMap<K, E>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, Field<Result<T, E>>)>,
{
    let mut values = HashMap::new();
    let mut errors = HashMap::new();

    for (key, field) in fields {
        match field.resolve() {
            Ok(value) => {
                values.insert(key, value);
            }
            Err(error) => {
                errors.insert(key, error);
            }
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

/// Runs `factory`, turning a panic into [`Panicked`].
pub fn handle<T, F>(factory: F) -> Result<T, Panicked>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(factory)).map_err(Panicked::from_payload)
}
