//! Toast Data Model
//!
//! Value types shared by the host and its presentation adapters. A `Toast`
//! never changes once created; dismissal removes it from the host instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::toast::action::{BoundAction, ToastAction};

/// Identifier of a toast, unique within the host that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToastId(u64);

impl ToastId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Numeric value of this id
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// Visual category of a toast. The host never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Neutral,
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Neutral,
        Severity::Info,
        Severity::Success,
        Severity::Warning,
        Severity::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Neutral => "neutral",
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" => Ok(Severity::Neutral),
            "info" => Ok(Severity::Info),
            "success" => Ok(Severity::Success),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(format!(
                "Invalid severity: {}. Valid options: neutral, info, success, warning, error",
                s
            )),
        }
    }
}

/// Symbolic display duration, turned into a timeout by a `DurationResolver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DurationLevel {
    #[default]
    Short,
    Medium,
    Long,
    Indefinite,
}

impl DurationLevel {
    pub const ALL: [DurationLevel; 4] = [
        DurationLevel::Short,
        DurationLevel::Medium,
        DurationLevel::Long,
        DurationLevel::Indefinite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationLevel::Short => "short",
            DurationLevel::Medium => "medium",
            DurationLevel::Long => "long",
            DurationLevel::Indefinite => "indefinite",
        }
    }
}

impl fmt::Display for DurationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(DurationLevel::Short),
            "medium" => Ok(DurationLevel::Medium),
            "long" => Ok(DurationLevel::Long),
            "indefinite" | "never" => Ok(DurationLevel::Indefinite),
            _ => Err(format!(
                "Invalid duration: {}. Valid options: short, medium, long, indefinite",
                s
            )),
        }
    }
}

/// An active toast as seen by observers of the host.
#[derive(Debug, Clone)]
pub struct Toast {
    id: ToastId,
    title: String,
    description: String,
    severity: Severity,
    duration: DurationLevel,
    primary_action: Option<BoundAction>,
    secondary_action: Option<BoundAction>,
}

impl Toast {
    pub(crate) fn new(
        id: ToastId,
        title: String,
        description: String,
        severity: Severity,
        duration: DurationLevel,
        primary_action: Option<BoundAction>,
        secondary_action: Option<BoundAction>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            severity,
            duration,
            primary_action,
            secondary_action,
        }
    }

    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn duration(&self) -> DurationLevel {
        self.duration
    }

    /// Primary action, already bound to this toast
    pub fn primary_action(&self) -> Option<&BoundAction> {
        self.primary_action.as_ref()
    }

    /// Secondary action, already bound to this toast
    pub fn secondary_action(&self) -> Option<&BoundAction> {
        self.secondary_action.as_ref()
    }
}

/// Everything needed to show a toast, with the defaults callers usually want.
///
/// ```
/// use toasthost::toast::{DurationLevel, Severity, ToastAction, ToastRequest};
///
/// let request = ToastRequest::new("Saved", "Your item was saved.")
///     .with_severity(Severity::Success)
///     .with_duration(DurationLevel::Long)
///     .with_primary_action(ToastAction::new("Undo", || {}).dismiss_after(true));
/// assert_eq!(request.severity(), Severity::Success);
/// ```
#[derive(Debug, Clone)]
pub struct ToastRequest {
    title: String,
    description: String,
    severity: Severity,
    duration: DurationLevel,
    primary_action: Option<ToastAction>,
    secondary_action: Option<ToastAction>,
    app_visible: bool,
}

impl ToastRequest {
    /// Neutral, short-lived toast with no actions
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::default(),
            duration: DurationLevel::default(),
            primary_action: None,
            secondary_action: None,
            app_visible: true,
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: DurationLevel) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_primary_action(mut self, action: ToastAction) -> Self {
        self.primary_action = Some(action);
        self
    }

    #[must_use]
    pub fn with_secondary_action(mut self, action: ToastAction) -> Self {
        self.secondary_action = Some(action);
        self
    }

    /// When `false` the request is dropped on submission without touching the host.
    #[must_use]
    pub fn app_visible(mut self, visible: bool) -> Self {
        self.app_visible = visible;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn duration(&self) -> DurationLevel {
        self.duration
    }

    pub fn is_app_visible(&self) -> bool {
        self.app_visible
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        String,
        Severity,
        DurationLevel,
        Option<ToastAction>,
        Option<ToastAction>,
    ) {
        (
            self.title,
            self.description,
            self.severity,
            self.duration,
            self.primary_action,
            self.secondary_action,
        )
    }
}
