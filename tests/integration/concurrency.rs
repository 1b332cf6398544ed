//! Concurrency and Property Tests
//!
//! Hammers a host from many tasks on a multi-threaded runtime and replays the
//! resulting event log to check the bound, ordering and at-most-once
//! dismissal guarantees. A property test compares single-threaded command
//! sequences against a plain FIFO model.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use futures::future::join_all;
use proptest::prelude::*;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use toasthost::toast::{
    DurationLevel, DurationTable, HostConfig, Severity, Toast, ToastEvent, ToastId, ToastQueue,
};

const TASKS: usize = 16;
const SHOWS_PER_TASK: usize = 200;

fn drain(events: &mut broadcast::Receiver<ToastEvent>) -> Vec<ToastEvent> {
    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    received
}

/// A snapshot is bounded and ordered oldest first
fn check_snapshot(toasts: &[Toast], max_visible: usize) {
    assert!(
        toasts.len() <= max_visible,
        "snapshot with {} toasts, max-visible {}",
        toasts.len(),
        max_visible
    );
    assert!(
        toasts.windows(2).all(|pair| pair[0].id() < pair[1].id()),
        "snapshot out of order: {:?}",
        toasts.iter().map(Toast::id).collect::<Vec<_>>()
    );
}

/// Replay the event log, checking every state it implies
fn replay(events: &[ToastEvent], max_visible: usize) -> HashSet<ToastId> {
    let mut active = HashSet::new();
    let mut seen = HashSet::new();

    for event in events {
        match event {
            ToastEvent::Shown { id } => {
                assert!(seen.insert(*id), "{} shown twice", id);
                active.insert(*id);
                assert!(
                    active.len() <= max_visible,
                    "{} toasts active with max-visible {}",
                    active.len(),
                    max_visible
                );
            }
            ToastEvent::Dismissed { id, reason } => {
                assert!(active.remove(id), "{} dismissed ({}) while not active", id, reason);
            }
        }
    }
    active
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_show_and_dismiss() {
    let max_visible = 5;
    let config = HostConfig::default()
        .with_max_visible(max_visible)
        .with_event_capacity(TASKS * SHOWS_PER_TASK * 4)
        .with_resolver(DurationTable::fixed(Duration::from_millis(2)));
    let queue = ToastQueue::new(config).unwrap();
    let mut events = queue.subscribe_events();

    let done = CancellationToken::new();
    let reader = {
        let queue = queue.clone();
        let done = done.clone();
        let mut updates = queue.subscribe();
        tokio::spawn(async move {
            let mut observed = 0usize;
            loop {
                tokio::select! {
                    _ = done.cancelled() => break,
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = updates.borrow_and_update().clone();
                        check_snapshot(&snapshot, max_visible);
                        check_snapshot(&queue.active_notifications(), max_visible);
                        observed += 1;
                    }
                }
            }
            observed
        })
    };

    let mut workers = Vec::new();
    for task in 0..TASKS {
        let queue = queue.clone();
        workers.push(tokio::spawn(async move {
            for n in 0..SHOWS_PER_TASK {
                let id = queue.show(
                    format!("task {} toast {}", task, n),
                    "",
                    Severity::Info,
                    DurationLevel::Short,
                    None,
                    None,
                );
                assert!(queue.len() <= max_visible);
                match n % 4 {
                    0 => {
                        queue.dismiss(id);
                    }
                    1 => tokio::task::yield_now().await,
                    2 if n % 50 == 2 => {
                        queue.dismiss_all();
                    }
                    _ => {}
                }
            }
        }));
    }
    for result in join_all(workers).await {
        result.unwrap();
    }

    // Let the remaining timers fire
    tokio::time::sleep(Duration::from_millis(100)).await;
    done.cancel();
    assert!(reader.await.unwrap() > 0);
    assert!(queue.is_empty());
    assert_eq!(queue.pending_timers(), 0);

    let log = drain(&mut events);
    assert!(replay(&log, max_visible).is_empty());

    let stats = queue.stats();
    assert_eq!(stats.shown, (TASKS * SHOWS_PER_TASK) as u64);
    assert_eq!(stats.removed(), stats.shown);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_manual_dismiss_races_timer() {
    let config = HostConfig::default()
        .with_max_visible(1000)
        .with_event_capacity(4096)
        .with_resolver(DurationTable::fixed(Duration::from_millis(1)));
    let queue = ToastQueue::new(config).unwrap();
    let mut events = queue.subscribe_events();

    let ids: Vec<ToastId> = (0..500)
        .map(|n| queue.show(format!("race {}", n), "", Severity::Neutral, DurationLevel::Short, None, None))
        .collect();

    tokio::time::sleep(Duration::from_millis(1)).await;
    let dismissers: Vec<_> = ids
        .chunks(100)
        .map(|chunk| {
            let queue = queue.clone();
            let chunk = chunk.to_vec();
            tokio::spawn(async move { chunk.into_iter().filter(|id| queue.dismiss(*id)).count() })
        })
        .collect();

    let manual: usize = join_all(dismissers)
        .await
        .into_iter()
        .map(|result| result.unwrap())
        .sum();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let log = drain(&mut events);
    assert!(replay(&log, 1000).is_empty());

    // Every toast left exactly once, either by hand or by its timer
    let mut removals: HashMap<ToastId, usize> = HashMap::new();
    for event in &log {
        if let ToastEvent::Dismissed { id, .. } = event {
            *removals.entry(*id).or_default() += 1;
        }
    }
    assert_eq!(removals.len(), ids.len());
    assert!(removals.values().all(|&count| count == 1));

    let stats = queue.stats();
    assert_eq!(stats.dismissed as usize, manual);
    assert_eq!(stats.expired as usize, ids.len() - manual);
}

#[derive(Debug, Clone)]
enum Op {
    Show,
    Dismiss(usize),
    DismissGone(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => Just(Op::Show),
        2 => (0usize..8).prop_map(Op::Dismiss),
        1 => (0usize..8).prop_map(Op::DismissGone),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_host_matches_fifo_model(
        max_visible in 1usize..6,
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let config = HostConfig::default()
            .with_max_visible(max_visible)
            .with_resolver(DurationTable::never());
        let queue = ToastQueue::with_handle(config, runtime.handle().clone()).unwrap();

        let mut model: VecDeque<ToastId> = VecDeque::new();
        let mut gone: Vec<ToastId> = Vec::new();

        for op in ops {
            match op {
                Op::Show => {
                    if model.len() == max_visible {
                        gone.extend(model.pop_front());
                    }
                    let id = queue.show("p", "", Severity::Neutral, DurationLevel::Short, None, None);
                    prop_assert!(!gone.contains(&id) && !model.contains(&id));
                    model.push_back(id);
                }
                Op::Dismiss(index) => {
                    if let Some(id) = model.get(index).copied() {
                        prop_assert!(queue.dismiss(id));
                        model.retain(|other| *other != id);
                        gone.push(id);
                    }
                }
                Op::DismissGone(index) => {
                    if let Some(id) = gone.get(index).copied() {
                        prop_assert!(!queue.dismiss(id));
                    }
                }
                Op::Clear => {
                    prop_assert_eq!(queue.dismiss_all(), model.len());
                    gone.extend(model.drain(..));
                }
            }

            let active: Vec<ToastId> = queue.active_notifications().iter().map(|toast| toast.id()).collect();
            prop_assert!(active.len() <= max_visible);
            prop_assert_eq!(active, model.iter().copied().collect::<Vec<_>>());
        }
    }
}
