//! Toast Host Integration Tests
//!
//! Drives the host through its public API the way an application and a
//! presentation adapter would: one side shows and dismisses toasts, the other
//! follows the snapshot stream and invokes actions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_stream::StreamExt;

use toasthost::toast::{
    DismissReason, DurationLevel, DurationTable, HostConfig, Severity, ToastAction, ToastError,
    ToastEvent, ToastQueue, ToastRequest,
};

#[tokio::test(start_paused = true)]
async fn test_adapter_sees_every_state_until_empty() {
    let queue = ToastQueue::new(HostConfig::default().with_max_visible(2)).unwrap();
    let mut stream = queue.toast_stream();

    let observer = tokio::spawn(async move {
        let mut sizes = Vec::new();
        while let Some(snapshot) = stream.next().await {
            sizes.push(snapshot.len());
            if snapshot.is_empty() && sizes.len() > 1 {
                break;
            }
        }
        sizes
    });
    tokio::task::yield_now().await;

    queue.show("Saved", "", Severity::Success, DurationLevel::Short, None, None);
    tokio::task::yield_now().await;
    queue.show("Synced", "", Severity::Info, DurationLevel::Medium, None, None);
    tokio::task::yield_now().await;

    // Short expires at 2000ms, Medium at 3500ms
    tokio::time::sleep(Duration::from_millis(4000)).await;

    let sizes = observer.await.unwrap();
    assert_eq!(sizes, vec![0, 1, 2, 1, 0]);
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_action_invoked_by_adapter_task() {
    let queue = ToastQueue::new(HostConfig::default()).unwrap();
    let confirmed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&confirmed);

    let request = ToastRequest::new("Delete draft?", "This cannot be undone")
        .with_severity(Severity::Warning)
        .with_duration(DurationLevel::Indefinite)
        .with_primary_action(
            ToastAction::new("Delete", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .dismiss_after(true),
        )
        .with_secondary_action(ToastAction::new("Keep", || {}));
    let id = queue.submit(request).unwrap();

    let mut updates = queue.subscribe();
    let adapter = tokio::spawn(async move {
        let toast = updates.borrow_and_update().iter().find(|toast| toast.id() == id).cloned();
        let toast = toast.expect("toast visible to adapter");
        assert_eq!(toast.secondary_action().unwrap().label(), "Keep");
        toast.primary_action().unwrap().invoke()
    });

    adapter.await.unwrap().unwrap();
    assert_eq!(confirmed.load(Ordering::SeqCst), 1);
    assert!(!queue.contains(id));
    assert_eq!(queue.stats().dismissed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_configured_durations_drive_expiry() {
    let table = DurationTable::default()
        .with(DurationLevel::Short, Some(Duration::from_millis(100)))
        .with(DurationLevel::Long, None);
    let queue = ToastQueue::new(HostConfig::default().with_resolver(table)).unwrap();
    let mut events = queue.subscribe_events();

    let short = queue.show("Short", "", Severity::Info, DurationLevel::Short, None, None);
    let long = queue.show("Long", "", Severity::Info, DurationLevel::Long, None, None);
    assert_eq!(queue.time_remaining(short), Some(Duration::from_millis(100)));
    assert_eq!(queue.time_remaining(long), None);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(queue.active_notifications().iter().map(|t| t.id()).collect::<Vec<_>>(), vec![long]);

    assert_eq!(events.recv().await.unwrap(), ToastEvent::Shown { id: short });
    assert_eq!(events.recv().await.unwrap(), ToastEvent::Shown { id: long });
    assert_eq!(
        events.recv().await.unwrap(),
        ToastEvent::Dismissed {
            id: short,
            reason: DismissReason::Expired
        }
    );
}

#[tokio::test]
async fn test_hidden_app_requests_are_dropped() {
    let queue = ToastQueue::new(HostConfig::default()).unwrap();
    let mut events = queue.subscribe_events();

    assert!(queue.submit(ToastRequest::new("Background", "").app_visible(false)).is_none());
    assert!(queue.is_empty());
    assert!(events.try_recv().is_err());
}

#[test]
fn test_host_requires_a_runtime() {
    let error = ToastQueue::new(HostConfig::default()).unwrap_err();
    assert_eq!(error, ToastError::NoRuntime);
}

#[test]
fn test_host_on_explicit_runtime_handle() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .unwrap();

    let config = HostConfig::default().with_resolver(DurationTable::fixed(Duration::from_millis(20)));
    let queue = ToastQueue::with_handle(config, runtime.handle().clone()).unwrap();

    // Called from a plain thread; the timer runs on the runtime's worker
    let id = queue.show("Background", "", Severity::Neutral, DurationLevel::Short, None, None);
    assert!(queue.contains(id));

    std::thread::sleep(Duration::from_millis(200));
    assert!(!queue.contains(id));
    assert_eq!(queue.stats().expired, 1);
}

#[test]
fn test_invalid_config_rejected() {
    tokio_test::block_on(async {
        let error = ToastQueue::new(HostConfig::default().with_max_visible(0)).unwrap_err();
        assert!(matches!(error, ToastError::InvalidConfig { .. }));
        assert!(error.to_string().contains("max-visible"));
    });
}
