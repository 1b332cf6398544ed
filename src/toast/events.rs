//! Toast Host Events
//!
//! Every change to the active set is reported on the host's broadcast
//! channel, in the order it was applied. Dismissals carry the reason the
//! toast left the set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::toast::model::ToastId;

/// Why a toast was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DismissReason {
    /// `dismiss(id)`, a user gesture or an action with dismiss-after
    Manual,
    /// The auto-dismiss timer fired
    Expired,
    /// Pushed out by a newer toast when the host was full
    Evicted,
    /// Removed by `dismiss_all()`
    Cleared,
}

impl fmt::Display for DismissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DismissReason::Manual => "manual",
            DismissReason::Expired => "expired",
            DismissReason::Evicted => "evicted",
            DismissReason::Cleared => "cleared",
        };
        f.write_str(name)
    }
}

/// Change notifications emitted by a toast host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastEvent {
    /// A toast was appended to the active set
    Shown { id: ToastId },

    /// A toast left the active set
    Dismissed { id: ToastId, reason: DismissReason },
}

impl ToastEvent {
    /// Id of the toast this event concerns
    pub fn id(&self) -> ToastId {
        match self {
            ToastEvent::Shown { id } => *id,
            ToastEvent::Dismissed { id, .. } => *id,
        }
    }

    /// Dismissal reason, if this is a dismissal
    pub fn reason(&self) -> Option<DismissReason> {
        match self {
            ToastEvent::Shown { .. } => None,
            ToastEvent::Dismissed { reason, .. } => Some(*reason),
        }
    }
}

/// Running totals for a host, updated under the same lock as the active set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastStats {
    pub shown: u64,
    pub dismissed: u64,
    pub expired: u64,
    pub evicted: u64,
    pub cleared: u64,
}

impl ToastStats {
    pub(crate) fn record(&mut self, reason: DismissReason) {
        match reason {
            DismissReason::Manual => self.dismissed += 1,
            DismissReason::Expired => self.expired += 1,
            DismissReason::Evicted => self.evicted += 1,
            DismissReason::Cleared => self.cleared += 1,
        }
    }

    /// Total toasts removed, whatever the reason
    pub fn removed(&self) -> u64 {
        self.dismissed + self.expired + self.evicted + self.cleared
    }
}
