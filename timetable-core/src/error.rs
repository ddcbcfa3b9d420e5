//! Error types for the timetable workspace.

use thiserror::Error;

/// Errors that can occur in timetable operations.
#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid week range '{0}'")]
    InvalidWeekRange(String),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid day '{0}'")]
    InvalidDay(String),

    #[error("Invalid lecture: {0}")]
    InvalidLecture(String),

    #[error("Increment must be at least one minute, got {0}s")]
    InvalidIncrement(i64),

    #[error("Day window is empty: {start} to {end}")]
    InvalidDayWindow { start: String, end: String },

    #[error("No term start date configured (set term_start = \"YYYY-MM-DD\")")]
    MissingTermStart,

    #[error("Import error: {0}")]
    Import(String),

    #[error("Department not found: {0}")]
    DepartmentNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TimetableError {
    /// Whether the error was caused by bad input rather than a failure on our side.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TimetableError::InvalidWeekRange(_)
                | TimetableError::InvalidTime(_)
                | TimetableError::InvalidDay(_)
                | TimetableError::InvalidLecture(_)
                | TimetableError::InvalidIncrement(_)
                | TimetableError::InvalidDayWindow { .. }
        )
    }
}

/// Result type alias for timetable operations.
pub type TimetableResult<T> = Result<T, TimetableError>;
