//! Toast Actions
//!
//! A `ToastAction` is what callers hand to the host: a label, a callback and
//! whether the toast should go away once the callback has run. When the toast
//! is created the host binds each action to the toast's id, producing a
//! `BoundAction` that presentation adapters invoke on user interaction.

use std::fmt;
use std::sync::{Arc, Weak};

use log::{debug, trace};

use crate::toast::model::ToastId;

type Callback = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Something that can remove a toast by id.
///
/// Implemented by the toast host; bound actions only hold a weak reference
/// to it so a toast never keeps its host alive.
pub trait DismissTarget: Send + Sync {
    /// Remove the toast if it is still active. Returns whether it was.
    fn dismiss(&self, id: ToastId) -> bool;
}

/// User-supplied action attached to a toast
#[derive(Clone)]
pub struct ToastAction {
    label: String,
    callback: Callback,
    dismiss_after: bool,
}

impl ToastAction {
    /// Create an action whose callback cannot fail
    pub fn new<F>(label: impl Into<String>, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::fallible(label, move || {
            callback();
            Ok(())
        })
    }

    /// Create an action whose callback may fail
    pub fn fallible<F>(label: impl Into<String>, callback: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            callback: Arc::new(callback),
            dismiss_after: false,
        }
    }

    /// Dismiss the owning toast after the callback succeeds. Off by default.
    #[must_use]
    pub fn dismiss_after(mut self, dismiss: bool) -> Self {
        self.dismiss_after = dismiss;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dismisses_after(&self) -> bool {
        self.dismiss_after
    }

    pub(crate) fn bind(self, toast_id: ToastId, target: Weak<dyn DismissTarget>) -> BoundAction {
        BoundAction {
            action: self,
            toast_id,
            target,
        }
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .field("dismiss_after", &self.dismiss_after)
            .finish_non_exhaustive()
    }
}

/// An action bound to the toast that owns it
#[derive(Clone)]
pub struct BoundAction {
    action: ToastAction,
    toast_id: ToastId,
    target: Weak<dyn DismissTarget>,
}

impl BoundAction {
    pub fn label(&self) -> &str {
        self.action.label()
    }

    pub fn dismisses_after(&self) -> bool {
        self.action.dismisses_after()
    }

    /// Id of the toast this action belongs to
    pub fn toast_id(&self) -> ToastId {
        self.toast_id
    }

    /// Run the user callback, then dismiss the owning toast if requested.
    ///
    /// A failing callback is returned as-is and the toast is left in place.
    pub fn invoke(&self) -> anyhow::Result<()> {
        (self.action.callback)()?;

        if self.action.dismiss_after {
            match self.target.upgrade() {
                Some(target) => {
                    let removed = target.dismiss(self.toast_id);
                    debug!(
                        "Action '{}' dismissed {} (was active: {})",
                        self.action.label, self.toast_id, removed
                    );
                }
                None => {
                    trace!(
                        "Action '{}' ran after its host was dropped, nothing to dismiss",
                        self.action.label
                    );
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("label", &self.action.label)
            .field("dismiss_after", &self.action.dismiss_after)
            .field("toast_id", &self.toast_id)
            .finish_non_exhaustive()
    }
}
