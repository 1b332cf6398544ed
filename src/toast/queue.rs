//! Toast Queue
//!
//! The host state machine. A `ToastQueue` owns the ordered set of active
//! toasts and their auto-dismiss timers, and serializes every mutation
//! through a single lock:
//!
//! - `show` evicts the oldest toast when full, appends the new one and
//!   schedules its timer in one locked step
//! - `dismiss`, `dismiss_all` and expiring timers take the same lock, so a
//!   timer that loses the race against a manual dismissal finds nothing to
//!   remove and does nothing
//! - snapshots and events are published before the lock is released, so
//!   observers see changes in exactly the order they were applied
//!
//! The lock is never held across an `.await` or while user code runs.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak};
use std::time::Duration;

use log::{debug, info, trace, warn};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;

use crate::toast::action::{DismissTarget, ToastAction};
use crate::toast::config::HostConfig;
use crate::toast::error::{ToastError, ToastResult};
use crate::toast::events::{DismissReason, ToastEvent, ToastStats};
use crate::toast::model::{DurationLevel, Severity, Toast, ToastId, ToastRequest};

/// Pending auto-dismiss timer
#[derive(Debug)]
struct TimerHandle {
    token: CancellationToken,
    deadline: Instant,
}

/// The mutable state guarded by the host lock
#[derive(Debug, Default)]
struct ActiveSet {
    toasts: VecDeque<Toast>,
    timers: HashMap<ToastId, TimerHandle>,
    stats: ToastStats,
    next_id: u64,
}

impl ActiveSet {
    fn allocate_id(&mut self) -> ToastId {
        let id = ToastId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: ToastId) -> Option<usize> {
        self.toasts.iter().position(|toast| toast.id() == id)
    }

    /// Remove a toast and cancel its timer together
    fn remove(&mut self, id: ToastId) -> Option<Toast> {
        let position = self.position(id)?;
        if let Some(timer) = self.timers.remove(&id) {
            timer.token.cancel();
        }
        self.toasts.remove(position)
    }

    fn snapshot(&self) -> Vec<Toast> {
        self.toasts.iter().cloned().collect()
    }
}

/// State shared between queue handles, timer tasks and bound actions
struct Shared {
    state: Mutex<ActiveSet>,
    config: HostConfig,
    runtime: Handle,
    snapshot_tx: watch::Sender<Vec<Toast>>,
    events_tx: broadcast::Sender<ToastEvent>,
}

impl Shared {
    fn publish(&self, state: &ActiveSet) {
        self.snapshot_tx.send_replace(state.snapshot());
    }

    fn emit(&self, event: ToastEvent) {
        // Only fails when nobody is listening
        let _ = self.events_tx.send(event);
    }

    fn remove_with(&self, id: ToastId, reason: DismissReason) -> bool {
        let mut state = self.state.lock();
        let Some(toast) = state.remove(id) else {
            trace!("{} already gone, ignoring {} dismissal", id, reason);
            return false;
        };

        state.stats.record(reason);
        self.emit(ToastEvent::Dismissed { id, reason });
        self.publish(&state);

        debug!(
            "Dismissed {} '{}' ({}), {} active",
            id,
            toast.title(),
            reason,
            state.toasts.len()
        );
        true
    }

    /// Evict from the head until there is room for one more toast
    fn make_room(&self, state: &mut ActiveSet) {
        while state.toasts.len() >= self.config.max_visible {
            let Some(oldest) = state.toasts.front().map(Toast::id) else {
                break;
            };
            state.remove(oldest);
            state.stats.record(DismissReason::Evicted);
            self.emit(ToastEvent::Dismissed {
                id: oldest,
                reason: DismissReason::Evicted,
            });
            debug!("Evicted {} to respect max-visible {}", oldest, self.config.max_visible);
        }
    }

    fn schedule(self: &Arc<Self>, state: &mut ActiveSet, id: ToastId, deadline: Instant) {
        let token = CancellationToken::new();
        state.timers.insert(
            id,
            TimerHandle {
                token: token.clone(),
                deadline,
            },
        );

        let host = Arc::downgrade(self);
        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    trace!("Timer for {} cancelled", id);
                }
                _ = tokio::time::sleep_until(deadline) => {
                    if let Some(host) = host.upgrade() {
                        host.remove_with(id, DismissReason::Expired);
                    }
                }
            }
        });
        trace!("Scheduled auto-dismiss of {} at {:?}", id, deadline);
    }
}

impl DismissTarget for Shared {
    fn dismiss(&self, id: ToastId) -> bool {
        self.remove_with(id, DismissReason::Manual)
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for (_, timer) in state.timers.drain() {
            timer.token.cancel();
        }
    }
}

/// Handle to a toast host. Clones share the same active set.
///
/// ```
/// use toasthost::toast::{DurationLevel, HostConfig, Severity, ToastQueue};
///
/// # tokio_test::block_on(async {
/// let queue = ToastQueue::new(HostConfig::default().with_max_visible(1)).unwrap();
/// queue.show("A", "", Severity::Info, DurationLevel::Indefinite, None, None);
/// let b = queue.show("B", "", Severity::Info, DurationLevel::Indefinite, None, None);
///
/// let active = queue.active_notifications();
/// assert_eq!(active.len(), 1);
/// assert_eq!(active[0].id(), b);
/// # });
/// ```
#[derive(Clone)]
pub struct ToastQueue {
    shared: Arc<Shared>,
}

impl ToastQueue {
    /// Create a host on the current tokio runtime
    pub fn new(config: HostConfig) -> ToastResult<Self> {
        let runtime = Handle::try_current().map_err(|_| ToastError::NoRuntime)?;
        Self::with_handle(config, runtime)
    }

    /// Create a host whose timers run on the given runtime
    pub fn with_handle(config: HostConfig, runtime: Handle) -> ToastResult<Self> {
        config.validate()?;

        let (snapshot_tx, _) = watch::channel(Vec::new());
        let (events_tx, _) = broadcast::channel(config.event_capacity);

        info!(
            "Toast host ready (max-visible: {}, dismissible: {})",
            config.max_visible, config.dismissible
        );

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ActiveSet::default()),
                config,
                runtime,
                snapshot_tx,
                events_tx,
            }),
        })
    }

    /// Show a toast and return its id.
    ///
    /// When the host is full the oldest toast is evicted first. The duration
    /// is resolved through the configured resolver; a concrete timeout
    /// schedules an auto-dismiss, `None` keeps the toast until dismissed.
    pub fn show(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        duration: DurationLevel,
        primary_action: Option<ToastAction>,
        secondary_action: Option<ToastAction>,
    ) -> ToastId {
        let shared = &self.shared;
        let timeout = shared.config.resolver().resolve(duration);
        // A deadline past the clock's range never fires
        let deadline = timeout.and_then(|timeout| {
            let deadline = Instant::now().checked_add(timeout);
            if deadline.is_none() {
                warn!(
                    "Timeout {:?} for {} toasts is out of range, keeping until dismissed",
                    timeout, duration
                );
            }
            deadline
        });
        let target: Weak<dyn DismissTarget> = Arc::downgrade(shared) as Weak<dyn DismissTarget>;

        let mut state = shared.state.lock();
        let id = state.allocate_id();
        let toast = Toast::new(
            id,
            title.into(),
            description.into(),
            severity,
            duration,
            primary_action.map(|action| action.bind(id, Weak::clone(&target))),
            secondary_action.map(|action| action.bind(id, target)),
        );

        shared.make_room(&mut state);
        debug!(
            "Showing {} '{}' ({}, {}, timeout: {:?})",
            id,
            toast.title(),
            severity,
            duration,
            timeout
        );
        state.toasts.push_back(toast);
        state.stats.shown += 1;

        if let Some(deadline) = deadline {
            shared.schedule(&mut state, id, deadline);
        }

        shared.emit(ToastEvent::Shown { id });
        shared.publish(&state);
        id
    }

    /// Show a prepared request. Requests made while the app is hidden are
    /// dropped and return `None`.
    pub fn submit(&self, request: ToastRequest) -> Option<ToastId> {
        if !request.is_app_visible() {
            debug!("App not visible, dropping toast '{}'", request.title());
            return None;
        }

        let (title, description, severity, duration, primary, secondary) = request.into_parts();
        Some(self.show(title, description, severity, duration, primary, secondary))
    }

    /// Remove a toast. Unknown or already removed ids are ignored.
    pub fn dismiss(&self, id: ToastId) -> bool {
        self.shared.remove_with(id, DismissReason::Manual)
    }

    /// Dismissal requested by the user through the adapter; ignored when
    /// the host is configured as not dismissible.
    pub fn dismiss_by_user(&self, id: ToastId) -> bool {
        if !self.shared.config.dismissible {
            trace!("Host not dismissible, ignoring user dismissal of {}", id);
            return false;
        }
        self.dismiss(id)
    }

    /// Remove every toast and cancel every pending timer. Returns how many
    /// toasts were removed.
    pub fn dismiss_all(&self) -> usize {
        let shared = &self.shared;
        let mut state = shared.state.lock();

        for (_, timer) in state.timers.drain() {
            timer.token.cancel();
        }
        let cleared: Vec<ToastId> = state.toasts.drain(..).map(|toast| toast.id()).collect();

        for &id in &cleared {
            state.stats.record(DismissReason::Cleared);
            shared.emit(ToastEvent::Dismissed {
                id,
                reason: DismissReason::Cleared,
            });
        }
        if !cleared.is_empty() {
            shared.publish(&state);
        }

        debug!("Cleared {} toasts", cleared.len());
        cleared.len()
    }

    /// Current toasts, oldest first
    pub fn active_notifications(&self) -> Vec<Toast> {
        self.shared.state.lock().snapshot()
    }

    pub fn get(&self, id: ToastId) -> Option<Toast> {
        let state = self.shared.state.lock();
        state.position(id).map(|position| state.toasts[position].clone())
    }

    pub fn contains(&self, id: ToastId) -> bool {
        self.shared.state.lock().position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().toasts.is_empty()
    }

    /// Time left before the toast auto-dismisses; `None` if it has no timer
    pub fn time_remaining(&self, id: ToastId) -> Option<Duration> {
        let state = self.shared.state.lock();
        state
            .timers
            .get(&id)
            .map(|timer| timer.deadline.saturating_duration_since(Instant::now()))
    }

    /// Number of auto-dismiss timers still pending
    pub fn pending_timers(&self) -> usize {
        self.shared.state.lock().timers.len()
    }

    pub fn stats(&self) -> ToastStats {
        self.shared.state.lock().stats
    }

    pub fn config(&self) -> &HostConfig {
        &self.shared.config
    }

    pub fn max_visible(&self) -> usize {
        self.shared.config.max_visible
    }

    pub fn is_dismissible(&self) -> bool {
        self.shared.config.dismissible
    }

    /// Watch the active list; the receiver always holds the latest snapshot.
    ///
    /// Snapshots are published under the host lock, so clone or drop a
    /// `borrow()` before calling back into the queue or invoking an action.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.shared.snapshot_tx.subscribe()
    }

    /// The active list as a stream, starting with the current snapshot
    pub fn toast_stream(&self) -> WatchStream<Vec<Toast>> {
        WatchStream::new(self.subscribe())
    }

    /// Receive show/dismiss events from now on
    pub fn subscribe_events(&self) -> broadcast::Receiver<ToastEvent> {
        self.shared.events_tx.subscribe()
    }
}

impl std::fmt::Debug for ToastQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("ToastQueue")
            .field("config", &self.shared.config)
            .field("active", &state.toasts.len())
            .field("pending_timers", &state.timers.len())
            .finish()
    }
}
