//! Colour management for console output
//!
//! Maps toast severities to terminal colours, honouring `--no-color` and the
//! `NO_COLOR` environment variable.

use colored::{ColoredString, Colorize};

use crate::toast::Severity;

/// Decide whether colours should be used
pub fn colours_wanted(no_color_flag: bool, no_color_env: Option<&str>) -> bool {
    // Any non-empty NO_COLOR disables colours (https://no-color.org)
    let env_disabled = no_color_env.is_some_and(|value| !value.is_empty());
    !no_color_flag && !env_disabled
}

/// Applies severity colours to console output
#[derive(Debug, Clone, Copy)]
pub struct ColourManager {
    enabled: bool,
}

impl ColourManager {
    /// Create a ColourManager with explicit colour control
    pub fn with_colours(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Create a ColourManager from the `--no-color` flag and the environment
    pub fn from_args(no_color_flag: bool) -> Self {
        let env = std::env::var("NO_COLOR").ok();
        Self::with_colours(colours_wanted(no_color_flag, env.as_deref()))
    }

    pub fn colours_enabled(&self) -> bool {
        self.enabled
    }

    /// Style text with the colour of a severity
    pub fn severity(&self, text: &str, severity: Severity) -> ColoredString {
        if !self.enabled {
            return text.normal();
        }
        match severity {
            Severity::Neutral => text.white(),
            Severity::Info => text.blue(),
            Severity::Success => text.green(),
            Severity::Warning => text.yellow(),
            Severity::Error => text.red().bold(),
        }
    }

    /// Format text as highlight
    pub fn highlight(&self, text: &str) -> ColoredString {
        if self.enabled {
            text.cyan().bold()
        } else {
            text.normal()
        }
    }

    /// Format secondary text such as timers and ids
    pub fn dim(&self, text: &str) -> ColoredString {
        if self.enabled {
            text.bright_black()
        } else {
            text.normal()
        }
    }
}

impl Default for ColourManager {
    fn default() -> Self {
        Self::with_colours(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colours_wanted() {
        assert!(colours_wanted(false, None));
        assert!(!colours_wanted(true, None));
        assert!(!colours_wanted(false, Some("1")));
        // An empty NO_COLOR does not count
        assert!(colours_wanted(false, Some("")));
    }

    #[test]
    fn test_disabled_manager_leaves_text_plain() {
        let manager = ColourManager::with_colours(false);
        assert!(!manager.colours_enabled());

        for severity in Severity::ALL {
            assert_eq!(manager.severity("Saved", severity).to_string(), "Saved");
        }
        assert_eq!(manager.highlight("toasts").to_string(), "toasts");
        assert_eq!(manager.dim("toast-1").to_string(), "toast-1");
    }

    #[test]
    fn test_enabled_manager_keeps_text() {
        let manager = ColourManager::default();
        assert!(manager.colours_enabled());
        assert!(manager.severity("Failed", Severity::Error).to_string().contains("Failed"));
    }
}
