//! Script execution against a live toast host

use anyhow::Result;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::cli::Step;
use crate::display::{ColourManager, ConsoleAdapter};
use crate::toast::{HostConfig, Severity, Toast, ToastAction, ToastQueue, ToastStats};

/// Actions attached to scripted toasts, chosen by severity.
///
/// `Retry` on error toasts always fails, so the toast stays put.
pub fn scripted_action(severity: Severity, title: &str) -> ToastAction {
    let title = title.to_string();
    let action = match severity {
        Severity::Error => ToastAction::fallible("Retry", move || {
            Err(anyhow::anyhow!("retrying '{}' failed", title))
        }),
        Severity::Success => ToastAction::new("Undo", move || info!("Undo requested for '{}'", title)),
        _ => ToastAction::new("OK", move || info!("'{}' acknowledged", title)),
    };
    action.dismiss_after(true)
}

fn toast_at(queue: &ToastQueue, position: usize) -> Option<Toast> {
    let toast = position
        .checked_sub(1)
        .and_then(|index| queue.active_notifications().into_iter().nth(index));
    if toast.is_none() {
        warn!("No toast at position {} ({} visible)", position, queue.len());
    }
    toast
}

/// Apply one step to the host
pub async fn run_step(queue: &ToastQueue, step: &Step) {
    debug!("Step: {}", step);
    match step {
        Step::Show {
            severity,
            duration,
            title,
            description,
        } => {
            let action = scripted_action(*severity, title);
            queue.show(title.as_str(), description.as_str(), *severity, *duration, Some(action), None);
        }
        Step::Wait(duration) => tokio::time::sleep(*duration).await,
        Step::Dismiss(position) => {
            if let Some(toast) = toast_at(queue, *position) {
                queue.dismiss(toast.id());
            }
        }
        Step::UserDismiss(position) => {
            if let Some(toast) = toast_at(queue, *position) {
                if !queue.dismiss_by_user(toast.id()) {
                    info!("'{}' cannot be dismissed by the user", toast.title());
                }
            }
        }
        Step::Action(position) => {
            let Some(toast) = toast_at(queue, *position) else {
                return;
            };
            match toast.primary_action() {
                Some(action) => {
                    if let Err(e) = action.invoke() {
                        warn!("Action '{}' on '{}' failed: {}", action.label(), toast.title(), e);
                    }
                }
                None => warn!("'{}' has no action", toast.title()),
            }
        }
        Step::Clear => {
            queue.dismiss_all();
        }
    }
    // Let observers catch up before the next step
    tokio::task::yield_now().await;
}

/// Run every step in order
pub async fn run_script(queue: &ToastQueue, steps: &[Step]) {
    for step in steps {
        run_step(queue, step).await;
    }
}

/// Run a script on a fresh host rendered to the console; returns the final statistics
pub async fn run_demo(config: HostConfig, steps: Vec<Step>, colours: ColourManager) -> Result<ToastStats> {
    let queue = ToastQueue::new(config)?;
    let shutdown = CancellationToken::new();
    let adapter = ConsoleAdapter::new(&queue, colours).spawn(shutdown.clone());

    info!("Running {} steps", steps.len());
    let interrupted = tokio::select! {
        _ = run_script(&queue, &steps) => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        warn!("Interrupted, stopping the script");
        shutdown.cancel();
    }

    let stats = queue.stats();
    drop(queue);
    if let Err(e) = adapter.await {
        warn!("Console adapter stopped abnormally: {}", e);
    }

    info!("Script finished: {} shown, {} removed", stats.shown, stats.removed());
    Ok(stats)
}
