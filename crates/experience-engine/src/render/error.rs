use std::fmt;

/// Outcome of a failed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// This frame was dropped; the next one may succeed.
    Skipped(String),
    /// The backend cannot continue.
    Fatal(String),
}

impl RenderError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::Fatal(_))
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Skipped(why) => write!(f, "frame skipped: {why}"),
            RenderError::Fatal(why) => write!(f, "fatal render error: {why}"),
        }
    }
}

impl std::error::Error for RenderError {}
