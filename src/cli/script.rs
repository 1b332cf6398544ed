//! Demo Script Parsing
//!
//! A script is a list of steps, each a colon-separated word:
//!
//! - `show:<severity>:<duration>:<title>[:<description>]`
//! - `wait:<ms>`
//! - `dismiss:<n>` and `user:<n>` remove the n-th visible toast (1-based)
//! - `action:<n>` invokes the primary action of the n-th visible toast
//! - `clear`
//!
//! In script files blank lines and lines starting with `#` are skipped.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::toast::{DurationLevel, Severity};

/// Script parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Unknown step '{step}'. Valid steps: show, wait, dismiss, user, action, clear")]
    UnknownStep { step: String },

    #[error("Step '{step}' is missing its {field}")]
    MissingField { step: String, field: &'static str },

    #[error("Step '{step}': {message}")]
    InvalidField { step: String, message: String },

    #[error("Line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ScriptError>,
    },
}

impl ScriptError {
    fn missing(step: &str, field: &'static str) -> Self {
        ScriptError::MissingField {
            step: step.to_string(),
            field,
        }
    }

    fn invalid(step: &str, message: impl Into<String>) -> Self {
        ScriptError::InvalidField {
            step: step.to_string(),
            message: message.into(),
        }
    }
}

/// One scripted interaction with the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Show {
        severity: Severity,
        duration: DurationLevel,
        title: String,
        description: String,
    },
    Wait(Duration),
    Dismiss(usize),
    UserDismiss(usize),
    Action(usize),
    Clear,
}

impl FromStr for Step {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let step = s.trim();
        let (keyword, rest) = match step.split_once(':') {
            Some((keyword, rest)) => (keyword, Some(rest)),
            None => (step, None),
        };

        match keyword.to_lowercase().as_str() {
            "show" => parse_show(step, rest.unwrap_or_default()),
            "wait" => {
                let ms = rest.ok_or_else(|| ScriptError::missing(step, "milliseconds"))?;
                let ms = ms
                    .parse::<u64>()
                    .map_err(|_| ScriptError::invalid(step, format!("'{}' is not a number of milliseconds", ms)))?;
                Ok(Step::Wait(Duration::from_millis(ms)))
            }
            "dismiss" => parse_position(step, rest).map(Step::Dismiss),
            "user" => parse_position(step, rest).map(Step::UserDismiss),
            "action" => parse_position(step, rest).map(Step::Action),
            "clear" if rest.is_none() => Ok(Step::Clear),
            _ => Err(ScriptError::UnknownStep {
                step: step.to_string(),
            }),
        }
    }
}

fn parse_show(step: &str, rest: &str) -> Result<Step, ScriptError> {
    let mut fields = rest.splitn(4, ':');

    let severity = match fields.next() {
        Some(field) if !field.is_empty() => field
            .parse::<Severity>()
            .map_err(|message| ScriptError::invalid(step, message))?,
        _ => return Err(ScriptError::missing(step, "severity")),
    };
    let duration = fields
        .next()
        .ok_or_else(|| ScriptError::missing(step, "duration"))?
        .parse::<DurationLevel>()
        .map_err(|message| ScriptError::invalid(step, message))?;
    let title = fields.next().ok_or_else(|| ScriptError::missing(step, "title"))?;
    let description = fields.next().unwrap_or_default();

    Ok(Step::Show {
        severity,
        duration,
        title: title.to_string(),
        description: description.to_string(),
    })
}

fn parse_position(step: &str, rest: Option<&str>) -> Result<usize, ScriptError> {
    let value = rest.ok_or_else(|| ScriptError::missing(step, "position"))?;
    match value.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position),
        _ => Err(ScriptError::invalid(
            step,
            format!("'{}' is not a position (1 is the oldest visible toast)", value),
        )),
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Show {
                severity,
                duration,
                title,
                description,
            } if description.is_empty() => write!(f, "show:{}:{}:{}", severity, duration, title),
            Step::Show {
                severity,
                duration,
                title,
                description,
            } => write!(f, "show:{}:{}:{}:{}", severity, duration, title, description),
            Step::Wait(duration) => write!(f, "wait:{}", duration.as_millis()),
            Step::Dismiss(position) => write!(f, "dismiss:{}", position),
            Step::UserDismiss(position) => write!(f, "user:{}", position),
            Step::Action(position) => write!(f, "action:{}", position),
            Step::Clear => f.write_str("clear"),
        }
    }
}

/// Parse steps given on the command line
pub fn parse_steps<S: AsRef<str>>(steps: &[S]) -> Result<Vec<Step>, ScriptError> {
    steps.iter().map(|step| step.as_ref().parse()).collect()
}

/// Parse a script file's contents
pub fn parse_script(content: &str) -> Result<Vec<Step>, ScriptError> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            text.parse().map_err(|source| ScriptError::AtLine {
                line,
                source: Box::new(source),
            })
        })
        .collect()
}

/// Script used when no steps are given
pub const DEMO_SCRIPT: &str = "\
# A short tour of the host
show:info:short:Welcome:Toasts appear oldest first
show:success:medium:Saved:Your changes were saved
show:warning:long:Disk almost full
show:error:indefinite:Sync failed:Retry from the toast action
wait:2100
action:3
wait:500
user:1
wait:3600
clear
";
