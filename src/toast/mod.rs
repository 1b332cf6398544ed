//! Toast Notification Host
//!
//! A concurrent host for transient toast/snackbar notifications. The host
//! keeps a bounded, insertion-ordered set of active toasts, times their
//! auto-dismissal and lets presentation adapters observe every change.
//!
//! # Architecture
//!
//! - **ToastQueue**: the host state machine; all mutations go through it
//! - **ToastAction / BoundAction**: user callbacks, optionally dismissing
//!   their toast once they have run
//! - **DurationResolver**: maps `Short`/`Medium`/`Long`/`Indefinite` to a
//!   timeout or "never"
//! - **Events**: ordered show/dismiss notifications with dismissal reasons
//!
//! Rendering, animation and gestures belong to the adapter: it watches the
//! active list and calls back into the queue on user action.
//!
//! # Example Usage
//!
//! ```no_run
//! use toasthost::toast::{HostConfig, Severity, DurationLevel, ToastAction, ToastQueue};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = ToastQueue::new(HostConfig::default())?;
//! let mut updates = queue.subscribe();
//!
//! queue.show(
//!     "Saved",
//!     "Your item was saved.",
//!     Severity::Success,
//!     DurationLevel::Short,
//!     Some(ToastAction::new("Undo", || println!("undo")).dismiss_after(true)),
//!     None,
//! );
//!
//! updates.changed().await?;
//! // Clone the snapshot before calling back into the queue
//! let active = updates.borrow().clone();
//! for toast in &active {
//!     println!("{}: {}", toast.title(), toast.description());
//! }
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod queue;
pub mod resolver;


pub use action::{BoundAction, DismissTarget, ToastAction};
pub use config::{HostConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_MAX_VISIBLE};
pub use error::{ToastError, ToastResult};
pub use events::{DismissReason, ToastEvent, ToastStats};
pub use model::{DurationLevel, Severity, Toast, ToastId, ToastRequest};
pub use queue::ToastQueue;
pub use resolver::{DurationResolver, DurationTable};
