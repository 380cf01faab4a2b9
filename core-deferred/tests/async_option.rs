mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{init, later, recorder_expecting, Recorder};
use core_algebra::ValueNotProvided;
use core_deferred::{AsyncOption, Deferred, ToAsync};
use futures::future::Shared;

#[core_async::test]
async fn test_to_result_on_both_branches() {
    init();

    assert_eq!(Some(7).to_async().to_result(|| "absent").await, Ok(7));
    assert_eq!(None::<i32>.to_async().to_result(|| "absent").await, Err("absent"));
}

#[test]
fn test_settled_sources_settle_synchronously() {
    init();

    let chained = AsyncOption::some(2)
        .map(|v| v + 1)
        .filter(|v| *v > 2)
        .bind(|v| Some(v * 10));

    assert_eq!(chained.settled(), Some(Some(30)));
    assert_eq!(AsyncOption::<i32>::none().settled(), Some(None));
}

#[core_async::test]
async fn test_projections_are_memoized() {
    init();
    let option = AsyncOption::from_future(async { Some("shared") });

    assert!(Shared::ptr_eq(&option.value(), &option.value()));
    assert!(Shared::ptr_eq(&option.has_value(), &option.has_value()));
    assert_eq!(option.value().await, Ok("shared"));
    assert!(option.has_value().await);
}

#[core_async::test]
async fn test_value_of_absent_is_value_not_provided() {
    init();
    let option = AsyncOption::<u8>::from_future(async { None });

    assert_eq!(option.value().await, Err(ValueNotProvided::default()));
    assert!(!option.has_value().await);
    assert_eq!(option.measured().await, None);
}

#[core_async::test]
async fn test_side_effects_run_only_on_their_branch() {
    init();
    let recorder = recorder_expecting(&[("some", 1), ("none", 1), ("both", 2)]);

    let (on_some, on_none, on_both) = (recorder.clone(), recorder.clone(), recorder.clone());
    let present = AsyncOption::from_future(async { Some(1) })
        .on_some(move |_| on_some.hit("some"))
        .on_none({
            let recorder = recorder.clone();
            move || recorder.hit("none")
        })
        .on_both(move |_| on_both.hit("both"));

    let absent = AsyncOption::<i32>::none()
        .on_some({
            let recorder = recorder.clone();
            move |_| recorder.hit("some")
        })
        .on_none(move || on_none.hit("none"))
        .on_both({
            let recorder = recorder.clone();
            move |value| {
                assert!(value.is_none());
                recorder.hit("both");
            }
        });

    assert_eq!(present.await, Some(1));
    assert_eq!(absent.await, None);
}

#[core_async::test]
async fn test_deferred_side_effect_delays_settlement() {
    init();
    let seen = Arc::new(AtomicUsize::new(0));

    let counter = seen.clone();
    let option = AsyncOption::some(4).on_some(move |value| {
        let value = *value;
        Deferred::pending(async move {
            core_async::sleep(core_async::Duration::from_millis(10)).await;
            counter.store(value, Ordering::SeqCst);
        })
    });

    assert_eq!(option.settled(), None);
    assert_eq!(option.await, Some(4));
    assert_eq!(seen.load(Ordering::SeqCst), 4);
}

#[core_async::test]
async fn test_map_async_and_bind_with_deferred_binders() {
    init();

    let doubled = AsyncOption::from_future(async { Some(21) })
        .map_async(|v| async move { v * 2 })
        .bind(|v| later(5, (v % 2 == 0).then_some(v)));

    assert_eq!(doubled.await, Some(42));
}

#[core_async::test]
async fn test_wrap_outside_keeps_absence_information() {
    init();

    assert_eq!(AsyncOption::<i32>::none().wrap_inside().await, None);
    assert_eq!(AsyncOption::<i32>::none().wrap_outside().await, Some(None));
    assert_eq!(AsyncOption::some(1).wrap_inside().await, Some(Some(1)));
}

#[core_async::test]
async fn test_or_and_otherwise_fill_absence() {
    init();
    let recorder = recorder_expecting(&[("fallback", 1)]);

    let fallback = recorder.clone();
    let filled = AsyncOption::<i32>::none().or(move || {
        fallback.hit("fallback");
        later(5, Some(9))
    });
    assert_eq!(filled.await, Some(9));

    let untouched = AsyncOption::some(1).or({
        let recorder = recorder.clone();
        move || {
            recorder.hit("fallback");
            Some(2)
        }
    });
    assert_eq!(untouched.await, Some(1));

    assert_eq!(AsyncOption::<i32>::none().otherwise(|| 3).await, Some(3));
    assert_eq!(
        AsyncOption::<i32>::none().otherwise(|| later(5, 4)).await,
        Some(4)
    );
}

type Predicate = Box<dyn FnOnce() -> Deferred<bool> + Send>;

#[core_async::test]
async fn test_else_if_invokes_every_predicate_once_one_is_deferred() {
    init();
    // The slow predicate fails, but it is deferred, so the walk keeps going
    // and every later predicate is still invoked before the results are ANDed.
    let recorder = recorder_expecting(&[("predicate", 3), ("factory", 0)]);

    let predicates: Vec<Predicate> = (0..3)
        .map(|index| {
            let recorder = recorder.clone();
            Box::new(move || {
                recorder.hit("predicate");
                if index == 0 {
                    later(20, false)
                } else {
                    later(5, true)
                }
            }) as Predicate
        })
        .collect();

    let factory_recorder = recorder.clone();
    let outcome = AsyncOption::<i32>::none().else_if(predicates, move || {
        factory_recorder.hit("factory");
        1
    });

    assert_eq!(outcome.await, None);
}

#[core_async::test]
async fn test_else_if_immediate_false_stops_the_walk() {
    init();
    let recorder = recorder_expecting(&[("predicate", 2), ("factory", 0)]);

    let predicates: Vec<Predicate> = vec![
        Box::new({
            let recorder = recorder.clone();
            move || {
                recorder.hit("predicate");
                later(5, true)
            }
        }),
        Box::new({
            let recorder = recorder.clone();
            move || {
                recorder.hit("predicate");
                Deferred::ready(false)
            }
        }),
        Box::new({
            let recorder = recorder.clone();
            move || {
                recorder.hit("predicate");
                Deferred::ready(true)
            }
        }),
    ];

    let outcome = AsyncOption::<i32>::none().else_if(predicates, {
        let recorder = recorder.clone();
        move || {
            recorder.hit("factory");
            1
        }
    });

    assert_eq!(outcome.settled(), Some(None));
}

#[core_async::test]
async fn test_else_if_fills_when_all_pass() {
    init();

    let predicates: Vec<Predicate> = vec![
        Box::new(|| later(5, true)),
        Box::new(|| Deferred::ready(true)),
    ];
    let filled = AsyncOption::<i32>::none().else_if(predicates, || later(5, 8));
    assert_eq!(filled.await, Some(8));

    let present = AsyncOption::some(1).else_if(Vec::<Predicate>::new(), || 2);
    assert_eq!(present.settled(), Some(Some(1)));
}

#[core_async::test]
async fn test_filter_with_deferred_predicate() {
    init();

    let kept = AsyncOption::some(10).filter(|v| later(5, *v > 5));
    let dropped = AsyncOption::some(1).filter(|v| later(5, *v > 5));

    assert_eq!(kept.await, Some(10));
    assert_eq!(dropped.await, None);
}

#[core_async::test]
async fn test_get_maps_absence_to_custom_error() {
    init();

    assert_eq!(AsyncOption::some(1).get(|| "nope").await, Ok(1));
    assert_eq!(AsyncOption::<i32>::none().get(|| "nope").await, Err("nope"));
}

#[core_async::test]
async fn test_clones_share_settlement() {
    init();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = runs.clone();
    let option = AsyncOption::from_future(async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Some(5)
    });
    let copy = option.clone();

    assert_eq!(option.await, Some(5));
    assert_eq!(copy.await, Some(5));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
