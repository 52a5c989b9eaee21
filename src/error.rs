// File: src/error.rs
//! Error taxonomy for input resolution and task edits.
//!
//! Plumbing code (config, files, JSON) keeps using `anyhow::Result`. The
//! variants here are the outcomes a front end has to tell apart, so they are
//! a closed enum that survives being wrapped in `anyhow::Error` and can be
//! recovered with `downcast_ref`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    /// The raw input was blank after trimming.
    EmptyInput,
    /// Neither a date expression nor a memo could be extracted.
    UnresolvedInput(String),
    /// The leading token is not a date expression. Only used for control
    /// flow inside the parser.
    UnresolvedDate(String),
    /// A date pattern referenced a token the formatter does not know.
    Format { token: String },
    /// The line under a task marker no longer has the expected shape.
    StaleMarker { line: u32 },
    /// A host asked to execute a command id that is not registered.
    UnknownCommand(String),
    /// The user aborted an interactive prompt.
    Cancelled,
}

impl JournalError {
    /// Text shown to the user for this outcome.
    pub fn user_message(&self) -> String {
        match self {
            JournalError::EmptyInput => "Please enter a value".to_string(),
            JournalError::UnresolvedInput(_) | JournalError::UnresolvedDate(_) => {
                "Could not understand input".to_string()
            }
            JournalError::Format { token } => format!("Unsupported date token '{}'", token),
            JournalError::StaleMarker { .. } => "Task marker changed, please retry".to_string(),
            JournalError::UnknownCommand(id) => format!("Unknown command '{}'", id),
            JournalError::Cancelled => String::new(),
        }
    }

    /// User aborts are not failures and must not be reported as such.
    pub fn is_cancel(&self) -> bool {
        matches!(self, JournalError::Cancelled)
    }

    /// Find a `JournalError` anywhere in an `anyhow` chain.
    pub fn find_in(err: &anyhow::Error) -> Option<&JournalError> {
        err.chain().find_map(|cause| cause.downcast_ref::<JournalError>())
    }
}

impl fmt::Display for JournalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalError::EmptyInput => write!(f, "input is empty"),
            JournalError::UnresolvedInput(raw) => write!(f, "could not understand input '{}'", raw),
            JournalError::UnresolvedDate(raw) => write!(f, "'{}' is not a date expression", raw),
            JournalError::Format { token } => write!(f, "unsupported date format token '{}'", token),
            JournalError::StaleMarker { line } => {
                write!(f, "task marker on line {} no longer matches", line)
            }
            JournalError::UnknownCommand(id) => write!(f, "unknown command '{}'", id),
            JournalError::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for JournalError {}
