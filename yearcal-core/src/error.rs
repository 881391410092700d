//! Error types for yearcal.

use std::path::PathBuf;

use thiserror::Error;

use crate::event::EventContext;

/// Errors that can occur while loading, resolving or rendering events.
#[derive(Error, Debug)]
pub enum YearCalError {
    /// A numeric field of an event record could not be read as an integer.
    #[error("Invalid {field} {value:?} in {event}: expected an integer")]
    Validation {
        event: EventContext,
        field: &'static str,
        value: String,
    },

    /// A day, month, weekday or occurrence index does not exist for the event's month.
    #[error("{reason} in {event}")]
    Range { event: EventContext, reason: String },

    #[error("Year {0} is outside the supported calendar range")]
    InvalidYear(i32),

    /// An unknown event group, or nothing to look categories up in.
    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Could not parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl YearCalError {
    /// Whether the error concerns a single event record, so that processing
    /// can carry on with the remaining events under [`ErrorPolicy::Skip`].
    ///
    /// [`ErrorPolicy::Skip`]: crate::resolve::ErrorPolicy::Skip
    pub fn is_per_event(&self) -> bool {
        matches!(self, YearCalError::Validation { .. } | YearCalError::Range { .. })
    }
}

/// Result type alias for yearcal operations.
pub type YearCalResult<T> = Result<T, YearCalError>;
