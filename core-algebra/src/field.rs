//! Named fields for the `extract` combinators.

use std::fmt;

/// A field handed to an `extract` combinator: either a container that is
/// already built, or a factory invoked only when the combinator runs.
pub enum Field<C> {
    Value(C),
    Lazy(Box<dyn FnOnce() -> C>),
}

impl<C> Field<C> {
    pub fn value(container: C) -> Self {
        Self::Value(container)
    }

    pub fn lazy<F>(factory: F) -> Self
    where
        F: FnOnce() -> C + 'static,
    {
        Self::Lazy(Box::new(factory))
    }

    /// Produces the container, running the factory if there is one.
    pub fn resolve(self) -> C {
        match self {
            Self::Value(container) => container,
            Self::Lazy(factory) => factory(),
        }
    }
}

impl<C> From<C> for Field<C> {
    fn from(container: C) -> Self {
        Self::Value(container)
    }
}

impl<C: fmt::Debug> fmt::Debug for Field<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(container) => f.debug_tuple("Value").field(container).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}
