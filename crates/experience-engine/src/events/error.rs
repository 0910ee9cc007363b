use std::fmt;

/// Misuse of the [`EventHub`](super::EventHub) API.
///
/// These are developer-facing diagnostics. The hub also logs them at warn
/// level, so callers that do not care can ignore the `Err` and carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The pattern was empty or contained no usable token.
    EmptyName,
    /// `trigger` was given more than one token.
    MultipleNames(String),
    /// A namespaced `trigger` did not name an event (`".ns"`).
    MissingEventName(String),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::EmptyName => write!(f, "event name pattern is empty"),
            EventError::MultipleNames(p) => {
                write!(f, "trigger accepts a single event name, got `{p}`")
            }
            EventError::MissingEventName(p) => {
                write!(f, "namespaced trigger `{p}` has no event name")
            }
        }
    }
}

impl std::error::Error for EventError {}
