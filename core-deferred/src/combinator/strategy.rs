use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::mem;
use std::ops::ControlFlow;

use super::Strategy;

/// Presence join: slots by input index, first `None` decides.
pub(crate) struct AllOptions<T> {
    slots: Vec<Option<T>>,
}

impl<T> AllOptions<T> {
    pub(crate) fn with_capacity(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
        }
    }
}

impl<T: Send + 'static> Strategy for AllOptions<T> {
    type Key = usize;
    type Input = Option<T>;
    type Output = Option<Vec<T>>;

    const NAME: &'static str = "option::all";

    fn accept(&mut self, index: usize, input: Option<T>) -> ControlFlow<Self::Output> {
        match input {
            Some(value) => {
                self.slots[index] = Some(value);
                ControlFlow::Continue(())
            }
            None => ControlFlow::Break(None),
        }
    }

    fn finish(&mut self) -> Self::Output {
        mem::take(&mut self.slots).into_iter().collect()
    }
}

/// Presence race: first `Some` by settlement order wins.
pub(crate) struct AnyOption<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for AnyOption<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Send + 'static> Strategy for AnyOption<T> {
    type Key = usize;
    type Input = Option<T>;
    type Output = Option<T>;

    const NAME: &'static str = "option::any";

    fn accept(&mut self, _index: usize, input: Option<T>) -> ControlFlow<Self::Output> {
        match input {
            Some(value) => ControlFlow::Break(Some(value)),
            None => ControlFlow::Continue(()),
        }
    }

    fn finish(&mut self) -> Self::Output {
        None
    }
}

/// Keyed presence join.
pub(crate) struct ExtractOptions<K, T> {
    values: HashMap<K, T>,
}

impl<K, T> Default for ExtractOptions<K, T> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<K, T> Strategy for ExtractOptions<K, T>
where
    K: Eq + Hash + Send + 'static,
    T: Send + 'static,
{
    type Key = K;
    type Input = Option<T>;
    type Output = Option<HashMap<K, T>>;

    const NAME: &'static str = "option::extract";

    fn accept(&mut self, key: K, input: Option<T>) -> ControlFlow<Self::Output> {
        match input {
            Some(value) => {
                self.values.insert(key, value);
                ControlFlow::Continue(())
            }
            None => ControlFlow::Break(None),
        }
    }

    fn finish(&mut self) -> Self::Output {
        Some(mem::take(&mut self.values))
    }
}

/// Outcome join: slots by input index, first `Err` decides.
pub(crate) struct AllResults<T, E> {
    slots: Vec<Option<T>>,
    _marker: PhantomData<fn() -> E>,
}

impl<T, E> AllResults<T, E> {
    pub(crate) fn with_capacity(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            _marker: PhantomData,
        }
    }
}

impl<T, E> Strategy for AllResults<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Key = usize;
    type Input = Result<T, E>;
    type Output = Result<Vec<T>, E>;

    const NAME: &'static str = "result::all";

    fn accept(&mut self, index: usize, input: Result<T, E>) -> ControlFlow<Self::Output> {
        match input {
            Ok(value) => {
                self.slots[index] = Some(value);
                ControlFlow::Continue(())
            }
            Err(error) => ControlFlow::Break(Err(error)),
        }
    }

    fn finish(&mut self) -> Self::Output {
        Ok(mem::take(&mut self.slots).into_iter().flatten().collect())
    }
}

/// Outcome race: first `Ok` wins, otherwise every error in input order.
pub(crate) struct AnyResult<T, E> {
    errors: Vec<Option<E>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, E> AnyResult<T, E> {
    pub(crate) fn with_capacity(len: usize) -> Self {
        Self {
            errors: (0..len).map(|_| None).collect(),
            _marker: PhantomData,
        }
    }
}

impl<T, E> Strategy for AnyResult<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Key = usize;
    type Input = Result<T, E>;
    type Output = Result<T, Vec<E>>;

    const NAME: &'static str = "result::any";

    fn accept(&mut self, index: usize, input: Result<T, E>) -> ControlFlow<Self::Output> {
        match input {
            Ok(value) => ControlFlow::Break(Ok(value)),
            Err(error) => {
                self.errors[index] = Some(error);
                ControlFlow::Continue(())
            }
        }
    }

    fn finish(&mut self) -> Self::Output {
        Err(mem::take(&mut self.errors).into_iter().flatten().collect())
    }
}

/// Keyed outcome join. Never breaks, so the error map is complete.
pub(crate) struct ExtractResults<K, T, E> {
    values: HashMap<K, T>,
    errors: HashMap<K, E>,
}

impl<K, T, E> Default for ExtractResults<K, T, E> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            errors: HashMap::new(),
        }
    }
}

impl<K, T, E> Strategy for ExtractResults<K, T, E>
where
    K: Eq + Hash + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Key = K;
    type Input = Result<T, E>;
    type Output = Result<HashMap<K, T>, HashMap<K, E>>;

    const NAME: &'static str = "result::extract";

    fn accept(&mut self, key: K, input: Result<T, E>) -> ControlFlow<Self::Output> {
        match input {
            Ok(value) => {
                self.values.insert(key, value);
            }
            Err(error) => {
                self.errors.insert(key, error);
            }
        }
        ControlFlow::Continue(())
    }

    fn finish(&mut self) -> Self::Output {
        if self.errors.is_empty() {
            Ok(mem::take(&mut self.values))
        } else {
            Err(mem::take(&mut self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_options_orders_by_index() {
        let mut strategy = AllOptions::with_capacity(3);
        assert!(strategy.accept(2, Some('c')).is_continue());
        assert!(strategy.accept(0, Some('a')).is_continue());
        assert!(strategy.accept(1, Some('b')).is_continue());
        assert_eq!(strategy.finish(), Some(vec!['a', 'b', 'c']));
    }

    #[test]
    fn test_any_result_keeps_errors_in_input_order() {
        let mut strategy = AnyResult::<i32, &str>::with_capacity(3);
        assert!(strategy.accept(1, Err("second")).is_continue());
        assert!(strategy.accept(2, Err("third")).is_continue());
        assert!(strategy.accept(0, Err("first")).is_continue());
        assert_eq!(strategy.finish(), Err(vec!["first", "second", "third"]));
    }

    #[test]
    fn test_extract_results_error_map_excludes_successes() {
        let mut strategy = ExtractResults::default();
        assert!(strategy.accept("a", Ok::<i32, &str>(1)).is_continue());
        assert!(strategy.accept("b", Err("x")).is_continue());

        let errors = strategy.finish().unwrap_err();
        assert_eq!(errors, HashMap::from([("b", "x")]));
    }

    #[test]
    fn test_all_results_breaks_on_error() {
        let mut strategy = AllResults::<i32, &str>::with_capacity(2);
        assert!(strategy.accept(0, Ok(1)).is_continue());
        assert_eq!(strategy.accept(1, Err("bad")), ControlFlow::Break(Err("bad")));
    }
}
