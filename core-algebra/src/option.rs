//! Presence container helpers.

use std::collections::HashMap;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::ValueNotProvided;
use crate::field::Field;

/// Operations the deferred layer expects from a presence container.
pub trait OptionExt<T>: Sized {
    fn has_value(&self) -> bool;

    /// Reads the value, failing with [`ValueNotProvided`] when absent.
    fn try_value(self) -> Result<T, ValueNotProvided>;

    /// `Some(v)` becomes `Some(Some(v))`; `None` stays `None`.
    fn wrap_inside(self) -> Option<Option<T>>;

    /// Always present, carrying the original container.
    fn wrap_outside(self) -> Option<Option<T>>;

    fn to_result<E, F>(self, error_factory: F) -> Result<T, E>
    where
        F: FnOnce() -> E;

    fn on_some<F>(self, callback: F) -> Self
    where
        F: FnOnce(&T);

    fn on_none<F>(self, callback: F) -> Self
    where
        F: FnOnce();
}

impl<T> OptionExt<T> for Option<T> {
    fn has_value(&self) -> bool {
        self.is_some()
    }

    fn try_value(self) -> Result<T, ValueNotProvided> {
        self.ok_or_else(ValueNotProvided::new)
    }

    fn wrap_inside(self) -> Option<Option<T>> {
        self.map(Some)
    }

    fn wrap_outside(self) -> Option<Option<T>> {
        Some(self)
    }

    fn to_result<E, F>(self, error_factory: F) -> Result<T, E>
    where
        F: FnOnce() -> E,
    {
        self.ok_or_else(error_factory)
    }

    fn on_some<F>(self, callback: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Some(value) = &self {
            callback(value);
        }
        self
    }

    fn on_none<F>(self, callback: F) -> Self
    where
        F: FnOnce(),
    {
        if self.is_none() {
            callback();
        }
        self
    }
}

/// Present only when every input is present. Stops at the first `None`.
pub fn all<T, I>(options: I) -> Option<Vec<T>>
where
    I: IntoIterator<Item = Option<T>>,
{
    options.into_iter().collect()
}

/// The first present input, in iteration order.
pub fn any<T, I>(options: I) -> Option<T>
where
    I: IntoIterator<Item = Option<T>>,
{
    options.into_iter().flatten().next()
}

/// Keyed [`all`]. Lazy fields are resolved in order and the walk stops at the
/// first absent field, so later factories are never invoked.
pub fn extract<K, T, I>(fields: I) -> Option<HashMap<K, T>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, Field<Option<T>>)>,
{
    fields
        .into_iter()
        .map(|(key, field)| field.resolve().map(|value| (key, value)))
        .collect()
}

/// Runs `factory`, turning a panic into `None`.
pub fn handle<T, F>(factory: F) -> Option<T>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(factory)).ok()
}
