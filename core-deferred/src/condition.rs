use futures::future::{join_all, FutureExt};
use tracing::trace;

use crate::deferred::Deferred;

/// Evaluates `else_if` predicates in order.
///
/// An immediate `false` stops the walk and decides the whole condition, even
/// if earlier predicates are still pending. Pending predicates are collected
/// and, once the walk ends without an immediate `false`, awaited together and
/// ANDed.
pub(crate) fn evaluate<I>(predicates: I) -> Deferred<bool>
where
    I: IntoIterator<Item = Deferred<bool>>,
{
    let mut pending = Vec::new();

    for predicate in predicates {
        match predicate {
            Deferred::Ready(false) => return Deferred::Ready(false),
            Deferred::Ready(true) => {}
            Deferred::Pending(future) => pending.push(future),
        }
    }

    match pending.len() {
        0 => Deferred::Ready(true),
        1 => match pending.pop() {
            Some(future) => Deferred::Pending(future),
            None => Deferred::Ready(true),
        },
        count => {
            trace!(count, "awaiting deferred else_if predicates together");
            Deferred::Pending(
                join_all(pending)
                    .map(|results| results.into_iter().all(|passed| passed))
                    .boxed(),
            )
        }
    }
}
