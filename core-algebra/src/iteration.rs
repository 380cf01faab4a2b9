//! Interruptible loops.
//!
//! Loop callbacks return one of several shapes (an outcome, a presence, a
//! [`Signal`], a `bool` or `()`). The `normalize_*` functions fold those
//! shapes onto a single decision, and the drivers in this module use that
//! decision to keep going, stop successfully (`Break`) or fail (`Abort`).
//!
//! Interrupted loops report the index of the element that interrupted them.

use tracing::debug;

/// Loop control for a single iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Continue,
    Break,
    Abort,
}

/// The subset of [`Signal`] that ends a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterruptSignal {
    /// Ends the loop, which then succeeds with what it has so far.
    Break,
    /// Ends the loop, which then fails with the current index.
    Abort,
}

impl From<InterruptSignal> for Signal {
    fn from(signal: InterruptSignal) -> Self {
        match signal {
            InterruptSignal::Break => Signal::Break,
            InterruptSignal::Abort => Signal::Abort,
        }
    }
}

/// What a value-producing loop callback may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopResult<T> {
    Result(Result<T, InterruptSignal>),
    Option(Option<T>),
    Signal(InterruptSignal),
}

impl<T> From<Result<T, InterruptSignal>> for LoopResult<T> {
    fn from(result: Result<T, InterruptSignal>) -> Self {
        Self::Result(result)
    }
}

impl<T> From<Option<T>> for LoopResult<T> {
    fn from(option: Option<T>) -> Self {
        Self::Option(option)
    }
}

impl<T> From<InterruptSignal> for LoopResult<T> {
    fn from(signal: InterruptSignal) -> Self {
        Self::Signal(signal)
    }
}

/// What a side-effect loop callback may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidResult {
    Unit,
    Bool(bool),
    Signal(Signal),
    Presence(bool),
    Outcome(Result<(), InterruptSignal>),
}

impl From<()> for VoidResult {
    fn from(_: ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for VoidResult {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<Signal> for VoidResult {
    fn from(signal: Signal) -> Self {
        Self::Signal(signal)
    }
}

impl From<InterruptSignal> for VoidResult {
    fn from(signal: InterruptSignal) -> Self {
        Self::Signal(signal.into())
    }
}

impl<T> From<Option<T>> for VoidResult {
    fn from(option: Option<T>) -> Self {
        Self::Presence(option.is_some())
    }
}

impl<T> From<Result<T, InterruptSignal>> for VoidResult {
    fn from(result: Result<T, InterruptSignal>) -> Self {
        Self::Outcome(result.map(|_| ()))
    }
}

impl<T> From<LoopResult<T>> for VoidResult {
    fn from(result: LoopResult<T>) -> Self {
        match result {
            LoopResult::Result(result) => result.into(),
            LoopResult::Option(option) => option.into(),
            LoopResult::Signal(signal) => signal.into(),
        }
    }
}

/// Folds a callback result onto `Ok(value)` or the interrupt it carries.
/// An absent presence counts as [`InterruptSignal::Abort`].
pub fn normalize_loop_result<T>(result: impl Into<LoopResult<T>>) -> Result<T, InterruptSignal> {
    match result.into() {
        LoopResult::Result(result) => result,
        LoopResult::Option(Some(value)) => Ok(value),
        LoopResult::Option(None) => Err(InterruptSignal::Abort),
        LoopResult::Signal(signal) => Err(signal),
    }
}

/// Folds a side-effect callback result onto a [`Signal`].
pub fn normalize_void_result(result: impl Into<VoidResult>) -> Signal {
    match result.into() {
        VoidResult::Unit => Signal::Continue,
        VoidResult::Bool(true) | VoidResult::Presence(true) => Signal::Continue,
        VoidResult::Bool(false) | VoidResult::Presence(false) => Signal::Abort,
        VoidResult::Signal(signal) => signal,
        VoidResult::Outcome(Ok(())) => Signal::Continue,
        VoidResult::Outcome(Err(signal)) => signal.into(),
    }
}

/// Collects `callback(0)`, `callback(1)`, ... until `length` is reached or the
/// callback interrupts. With `length = None` the callback must eventually
/// interrupt.
pub fn array<T, R, F>(length: Option<usize>, mut callback: F) -> Result<Vec<T>, usize>
where
    F: FnMut(usize) -> R,
    R: Into<LoopResult<T>>,
{
    let mut values = Vec::with_capacity(length.unwrap_or(0));

    for index in 0..length.unwrap_or(usize::MAX) {
        match normalize_loop_result(callback(index)) {
            Ok(value) => values.push(value),
            Err(InterruptSignal::Break) => break,
            Err(InterruptSignal::Abort) => {
                debug!(index, "array loop aborted");
                return Err(index);
            }
        }
    }

    Ok(values)
}

/// Runs `callback` for each item. Succeeds with the number of items that
/// continued the loop.
pub fn for_each<I, R, F>(items: I, mut callback: F) -> Result<usize, usize>
where
    I: IntoIterator,
    F: FnMut(I::Item, usize) -> R,
    R: Into<VoidResult>,
{
    let mut count = 0;

    for (index, item) in items.into_iter().enumerate() {
        match normalize_void_result(callback(item, index)) {
            Signal::Continue => count += 1,
            Signal::Break => break,
            Signal::Abort => {
                debug!(index, "for_each loop aborted");
                return Err(index);
            }
        }
    }

    Ok(count)
}

/// Maps every item, stopping early when the mapper interrupts.
pub fn map<I, U, R, F>(items: I, mut mapper: F) -> Result<Vec<U>, usize>
where
    I: IntoIterator,
    F: FnMut(I::Item, usize) -> R,
    R: Into<LoopResult<U>>,
{
    let items = items.into_iter();
    let mut mapped = Vec::with_capacity(items.size_hint().0);

    for (index, item) in items.enumerate() {
        match normalize_loop_result(mapper(item, index)) {
            Ok(value) => mapped.push(value),
            Err(InterruptSignal::Break) => break,
            Err(InterruptSignal::Abort) => {
                debug!(index, "map loop aborted");
                return Err(index);
            }
        }
    }

    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_loop_result() {
        assert_eq!(normalize_loop_result(Ok::<_, InterruptSignal>(1)), Ok(1));
        assert_eq!(
            normalize_loop_result(Err::<i32, _>(InterruptSignal::Break)),
            Err(InterruptSignal::Break)
        );
        assert_eq!(normalize_loop_result(Some(2)), Ok(2));
        assert_eq!(
            normalize_loop_result(None::<i32>),
            Err(InterruptSignal::Abort)
        );
        assert_eq!(
            normalize_loop_result::<i32>(InterruptSignal::Break),
            Err(InterruptSignal::Break)
        );
    }

    #[test]
    fn test_normalize_void_result() {
        assert_eq!(normalize_void_result(()), Signal::Continue);
        assert_eq!(normalize_void_result(true), Signal::Continue);
        assert_eq!(normalize_void_result(false), Signal::Abort);
        assert_eq!(normalize_void_result(Signal::Break), Signal::Break);
        assert_eq!(normalize_void_result(InterruptSignal::Abort), Signal::Abort);
        assert_eq!(normalize_void_result(Some("x")), Signal::Continue);
        assert_eq!(normalize_void_result(None::<&str>), Signal::Abort);
        assert_eq!(
            normalize_void_result(Ok::<_, InterruptSignal>(3)),
            Signal::Continue
        );
        assert_eq!(
            normalize_void_result(Err::<i32, _>(InterruptSignal::Break)),
            Signal::Break
        );
        assert_eq!(
            normalize_void_result(LoopResult::<i32>::Option(None)),
            Signal::Abort
        );
    }

    #[test]
    fn test_array_with_length() {
        assert_eq!(array(Some(4), |i| Some(i * 2)), Ok(vec![0, 2, 4, 6]));
        assert_eq!(array(Some(0), |i| Some(i)), Ok(vec![]));
    }

    #[test]
    fn test_array_break_and_abort() {
        let broken = array(Some(10), |i| {
            if i == 3 {
                Err(InterruptSignal::Break)
            } else {
                Ok(i)
            }
        });
        assert_eq!(broken, Ok(vec![0, 1, 2]));

        let aborted = array(Some(10), |i| (i != 5).then_some(i));
        assert_eq!(aborted, Err(5));
    }

    #[test]
    fn test_array_unbounded() {
        let values = array(None, |i| {
            if i < 3 {
                LoopResult::Option(Some(i))
            } else {
                LoopResult::Signal(InterruptSignal::Break)
            }
        });
        assert_eq!(values, Ok(vec![0, 1, 2]));
    }

    #[test]
    fn test_for_each_counts() {
        let mut seen = Vec::new();
        let counted = for_each(vec!["a", "b", "c"], |item, index| {
            seen.push((item, index));
        });
        assert_eq!(counted, Ok(3));
        assert_eq!(seen, vec![("a", 0), ("b", 1), ("c", 2)]);
    }

    #[test]
    fn test_for_each_interrupts() {
        assert_eq!(
            for_each(1..=10, |item, _| if item == 4 { Signal::Break } else { Signal::Continue }),
            Ok(3)
        );
        assert_eq!(for_each(1..=10, |item, _| item != 7), Err(6));
    }

    #[test]
    fn test_map() {
        assert_eq!(
            map(vec![1, 2, 3], |item, index| Some(item + index)),
            Ok(vec![1, 3, 5])
        );
        assert_eq!(
            map(vec![1, 2, 3], |item, _| if item == 3 {
                Err(InterruptSignal::Break)
            } else {
                Ok(item * 10)
            }),
            Ok(vec![10, 20])
        );
        assert_eq!(map(vec![1, 2, 3], |item, _| (item < 2).then_some(item)), Err(1));
    }
}
