//! Integration tests for the core-async shim.

use core_async::{runtime, task, time};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

#[core_async::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    let result = handle.await.unwrap();
    assert_eq!(result, 42);
}

#[core_async::test]
async fn test_sleep() {
    let start = time::Instant::now();
    time::sleep(time::Duration::from_millis(50)).await;
    let elapsed = start.elapsed();
    assert!(elapsed >= time::Duration::from_millis(50));
}

#[core_async::test]
async fn test_detach_inside_runtime() {
    let done = Arc::new(AtomicUsize::new(0));

    let counter = done.clone();
    task::detach(async move {
        task::yield_now().await;
        counter.fetch_add(1, Ordering::SeqCst);
    });

    time::sleep(time::Duration::from_millis(10)).await;
    assert_eq!(done.load(Ordering::SeqCst), 1);
}

#[test]
fn test_detach_outside_runtime() {
    assert!(!runtime::in_context());

    let (tx, rx) = mpsc::channel();
    task::detach(async move {
        time::sleep(time::Duration::from_millis(5)).await;
        tx.send(7).unwrap();
    });

    assert_eq!(rx.recv_timeout(std::time::Duration::from_secs(5)), Ok(7));
}

#[test]
fn test_detach_outside_runtime_uses_background_worker() {
    let (tx, rx) = mpsc::channel();
    task::detach(async move {
        let name = thread::current().name().map(str::to_owned);
        tx.send(name).unwrap();
    });

    let name = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
    assert_eq!(name.as_deref(), Some(runtime::BACKGROUND_THREAD_NAME));
}

#[cfg(target_os = "linux")]
fn thread_count() -> usize {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| {
            status
                .lines()
                .find_map(|line| line.strip_prefix("Threads:"))
                .and_then(|count| count.trim().parse().ok())
        })
        .unwrap_or(0)
}

#[cfg(target_os = "linux")]
#[test]
fn test_detach_outside_runtime_does_not_spawn_per_future_threads() {
    // Warm the background runtime so its worker is counted up front.
    let (tx, rx) = mpsc::channel();
    task::detach(async move {
        tx.send(()).unwrap();
    });
    rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();

    let before = thread_count();
    let (tx, rx) = mpsc::channel();
    for _ in 0..200 {
        let tx = tx.clone();
        task::detach(async move {
            time::sleep(time::Duration::from_millis(200)).await;
            tx.send(()).unwrap();
        });
    }
    drop(tx);

    let during = thread_count();
    // Other tests in this binary may start a few threads concurrently.
    assert!(during < before + 32, "threads grew from {before} to {during}");

    assert_eq!(rx.iter().count(), 200);
}

#[core_async::test]
async fn test_in_context() {
    assert!(runtime::in_context());
}

#[core_async::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multi_thread_flavor() {
    let flavor = runtime::Handle::current().runtime_flavor();
    assert_eq!(flavor, runtime::RuntimeFlavor::MultiThread);

    let counter = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..10)
        .map(|_| {
            let counter = counter.clone();
            task::spawn(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(counter.load(Ordering::SeqCst), 10);
}

#[core_async::test]
async fn test_current_thread_is_default() {
    let flavor = runtime::Handle::current().runtime_flavor();
    assert_eq!(flavor, runtime::RuntimeFlavor::CurrentThread);
}

#[core_async::test]
async fn test_yield_now() {
    task::yield_now().await;
}
