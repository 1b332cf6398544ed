//! Toast Host Configuration
//!
//! Construction-time settings for a `ToastQueue`. Values are validated when
//! the host is built; nothing here can change afterwards.

use std::fmt;
use std::sync::Arc;

use crate::toast::error::{ToastError, ToastResult};
use crate::toast::resolver::{DurationResolver, DurationTable};

/// Default number of toasts shown at once
pub const DEFAULT_MAX_VISIBLE: usize = 3;

/// Default capacity of the event broadcast channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Settings for a toast host
#[derive(Clone)]
pub struct HostConfig {
    /// Maximum number of simultaneously active toasts
    pub max_visible: usize,
    /// Whether users may dismiss toasts through the adapter (gestures, close buttons)
    pub dismissible: bool,
    /// Events buffered per subscriber before slow receivers start lagging
    pub event_capacity: usize,
    resolver: Arc<dyn DurationResolver>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_visible: DEFAULT_MAX_VISIBLE,
            dismissible: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            resolver: Arc::new(DurationTable::default()),
        }
    }
}

impl HostConfig {
    #[must_use]
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible;
        self
    }

    #[must_use]
    pub fn with_dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Use a custom resolver, e.g. a closure `|level| Some(duration)`
    #[must_use]
    pub fn with_resolver<R>(mut self, resolver: R) -> Self
    where
        R: DurationResolver + 'static,
    {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Share an existing resolver between hosts
    #[must_use]
    pub fn with_shared_resolver(mut self, resolver: Arc<dyn DurationResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn resolver(&self) -> &Arc<dyn DurationResolver> {
        &self.resolver
    }

    /// Check the settings can drive a host
    pub fn validate(&self) -> ToastResult<()> {
        if self.max_visible == 0 {
            return Err(ToastError::invalid_config("max-visible must be at least 1"));
        }
        if self.event_capacity == 0 {
            return Err(ToastError::invalid_config("event-capacity must be at least 1"));
        }
        Ok(())
    }
}

impl fmt::Debug for HostConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostConfig")
            .field("max_visible", &self.max_visible)
            .field("dismissible", &self.dismissible)
            .field("event_capacity", &self.event_capacity)
            .finish_non_exhaustive()
    }
}
