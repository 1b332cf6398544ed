//! Duration Resolution
//!
//! Maps a symbolic `DurationLevel` to a concrete auto-dismiss timeout, or to
//! `None` for toasts that stay until dismissed. Resolvers are supplied by the
//! host application and must be pure: the queue may call them from any thread.

use std::time::Duration;

use crate::toast::model::DurationLevel;

/// Default timeout for `DurationLevel::Short`
pub const DEFAULT_SHORT: Duration = Duration::from_millis(2000);
/// Default timeout for `DurationLevel::Medium`
pub const DEFAULT_MEDIUM: Duration = Duration::from_millis(3500);
/// Default timeout for `DurationLevel::Long`
pub const DEFAULT_LONG: Duration = Duration::from_millis(5000);

/// Resolves a display duration into an optional timeout
pub trait DurationResolver: Send + Sync {
    /// `None` means the toast is never dismissed automatically
    fn resolve(&self, level: DurationLevel) -> Option<Duration>;
}

impl<F> DurationResolver for F
where
    F: Fn(DurationLevel) -> Option<Duration> + Send + Sync,
{
    fn resolve(&self, level: DurationLevel) -> Option<Duration> {
        self(level)
    }
}

/// Table-driven resolver with one entry per level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationTable {
    pub short: Option<Duration>,
    pub medium: Option<Duration>,
    pub long: Option<Duration>,
    pub indefinite: Option<Duration>,
}

impl Default for DurationTable {
    fn default() -> Self {
        Self {
            short: Some(DEFAULT_SHORT),
            medium: Some(DEFAULT_MEDIUM),
            long: Some(DEFAULT_LONG),
            indefinite: None,
        }
    }
}

impl DurationTable {
    /// Every level stays until dismissed
    pub fn never() -> Self {
        Self {
            short: None,
            medium: None,
            long: None,
            indefinite: None,
        }
    }

    /// Every level, including `Indefinite`, uses the same timeout
    pub fn fixed(timeout: Duration) -> Self {
        Self {
            short: Some(timeout),
            medium: Some(timeout),
            long: Some(timeout),
            indefinite: Some(timeout),
        }
    }

    /// Replace the entry for one level
    #[must_use]
    pub fn with(mut self, level: DurationLevel, timeout: Option<Duration>) -> Self {
        *self.slot_mut(level) = timeout;
        self
    }

    pub fn get(&self, level: DurationLevel) -> Option<Duration> {
        match level {
            DurationLevel::Short => self.short,
            DurationLevel::Medium => self.medium,
            DurationLevel::Long => self.long,
            DurationLevel::Indefinite => self.indefinite,
        }
    }

    fn slot_mut(&mut self, level: DurationLevel) -> &mut Option<Duration> {
        match level {
            DurationLevel::Short => &mut self.short,
            DurationLevel::Medium => &mut self.medium,
            DurationLevel::Long => &mut self.long,
            DurationLevel::Indefinite => &mut self.indefinite,
        }
    }
}

impl DurationResolver for DurationTable {
    fn resolve(&self, level: DurationLevel) -> Option<Duration> {
        self.get(level)
    }
}
