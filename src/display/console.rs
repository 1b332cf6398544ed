//! Console presentation adapter
//!
//! Follows a toast host from the outside: every event becomes one line of
//! output and every change to the active list is rendered in full. The
//! adapter only holds receivers, so it never keeps the host alive and
//! finishes once the host is dropped.

use std::io::{self, Write};

use log::{debug, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::display::colours::ColourManager;
use crate::toast::{Toast, ToastEvent, ToastId, ToastQueue};

/// Renders toast events and the active list as text
pub struct ConsoleAdapter {
    events: broadcast::Receiver<ToastEvent>,
    snapshots: watch::Receiver<Vec<Toast>>,
    last: Vec<Toast>,
    max_visible: usize,
    colours: ColourManager,
    out: Box<dyn Write + Send>,
}

impl ConsoleAdapter {
    /// Attach to a host, writing to stdout
    pub fn new(queue: &ToastQueue, colours: ColourManager) -> Self {
        Self::with_writer(queue, colours, Box::new(io::stdout()))
    }

    pub fn with_writer(queue: &ToastQueue, colours: ColourManager, out: Box<dyn Write + Send>) -> Self {
        let mut snapshots = queue.subscribe();
        let last = snapshots.borrow_and_update().clone();
        Self {
            events: queue.subscribe_events(),
            snapshots,
            last,
            max_visible: queue.max_visible(),
            colours,
            out,
        }
    }

    /// One line describing an event
    pub fn render_event(&self, event: &ToastEvent) -> String {
        let id = event.id();
        let title = self.title_of(id).unwrap_or_default();
        match event {
            ToastEvent::Shown { .. } => {
                format!("{} {} {}", self.colours.highlight("+"), self.colours.dim(&id.to_string()), title)
            }
            ToastEvent::Dismissed { reason, .. } => format!(
                "{} {} {} ({})",
                self.colours.highlight("-"),
                self.colours.dim(&id.to_string()),
                title,
                reason
            ),
        }
    }

    /// The active list, oldest first, numbered from 1
    pub fn render_list(&self, toasts: &[Toast]) -> String {
        let mut lines = vec![format!(
            "{} {}/{}",
            self.colours.highlight("toasts"),
            toasts.len(),
            self.max_visible
        )];

        for (index, toast) in toasts.iter().enumerate() {
            let mut line = format!(
                "  {}. {} {}",
                index + 1,
                self.colours
                    .severity(&format!("[{}]", toast.severity()), toast.severity()),
                toast.title()
            );
            if !toast.description().is_empty() {
                line.push_str(&format!(" - {}", toast.description()));
            }
            line.push_str(&format!(" {}", self.colours.dim(&format!("({})", toast.duration()))));
            for action in [toast.primary_action(), toast.secondary_action()].into_iter().flatten() {
                line.push_str(&format!(" [{}]", action.label()));
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    fn title_of(&self, id: ToastId) -> Option<String> {
        let current = self.snapshots.borrow();
        self.last
            .iter()
            .chain(current.iter())
            .find(|toast| toast.id() == id)
            .map(|toast| toast.title().to_string())
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!("Console output error: {}", e);
        }
    }

    /// Handle one event and render the list if it changed
    pub fn handle(&mut self, event: &ToastEvent) {
        let line = self.render_event(event);
        self.write_line(&line);

        // The list may already reflect later events; render it once per change
        let current = self.snapshots.borrow_and_update().clone();
        if !same_toasts(&current, &self.last) {
            let rendered = self.render_list(&current);
            self.write_line(&rendered);
            self.last = current;
        }
    }

    /// Follow the host until it is dropped or `shutdown` is cancelled
    pub async fn run(mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                received = self.events.recv() => match received {
                    Ok(event) => self.handle(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Console adapter lagged, {} events skipped", skipped);
                    }
                    Err(RecvError::Closed) => {
                        debug!("Toast host dropped, console adapter finished");
                        break;
                    }
                },
                _ = shutdown.cancelled() => {
                    debug!("Console adapter cancelled");
                    break;
                }
            }
        }
        let _ = self.out.flush();
    }

    /// Run the adapter as a background task
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

fn same_toasts(a: &[Toast], b: &[Toast]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.id() == y.id())
}
