use std::fmt;

use crate::assets::AssetError;
use crate::events::EventError;

/// Failure to assemble an [`Experience`](super::Experience).
#[derive(Debug, Clone, PartialEq)]
pub enum ExperienceError {
    /// The loader rejected the manifest or its retrievers.
    Assets(AssetError),
    /// Internal wiring could not subscribe.
    Events(EventError),
}

impl fmt::Display for ExperienceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceError::Assets(e) => write!(f, "asset setup failed: {e}"),
            ExperienceError::Events(e) => write!(f, "event wiring failed: {e}"),
        }
    }
}

impl std::error::Error for ExperienceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExperienceError::Assets(e) => Some(e),
            ExperienceError::Events(e) => Some(e),
        }
    }
}

impl From<AssetError> for ExperienceError {
    fn from(e: AssetError) -> Self {
        ExperienceError::Assets(e)
    }
}

impl From<EventError> for ExperienceError {
    fn from(e: EventError) -> Self {
        ExperienceError::Events(e)
    }
}
