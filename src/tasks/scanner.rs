// File: src/tasks/scanner.rs
//! Classifies markdown lines as open or completed checkbox tasks.
//!
//! Grammar, anchored at column 0:
//!   open      `* [ ] text` or `* [] text`
//!   completed `* [x] text` or `* [X] text`
//! followed by one or more spaces and a non-empty remainder. `[  ]` (two
//! spaces) and shifted `[>]` lines are not tasks.
use crate::tasks::types::{Diagnostic, Range, TaskMarker, TaskState, Transition};
use once_cell::sync::Lazy;
use regex::Regex;

static OPEN_TASK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\* \[ ?\] +.+").unwrap());
static COMPLETED_TASK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\* \[[xX]\] +.+").unwrap());

/// Column of the character between the checkbox brackets.
pub const MARKER_COLUMN: u32 = 3;

pub fn classify(line: &str) -> Option<TaskState> {
    if COMPLETED_TASK.is_match(line) {
        Some(TaskState::Completed)
    } else if OPEN_TASK.is_match(line) {
        Some(TaskState::Open)
    } else {
        None
    }
}

pub fn scan_line(line: &str, line_number: u32) -> Option<TaskMarker> {
    let state = classify(line)?;
    let end = if line.as_bytes().get(MARKER_COLUMN as usize) == Some(&b']') {
        MARKER_COLUMN
    } else {
        MARKER_COLUMN + 1
    };
    Some(TaskMarker {
        line: line_number,
        columns: (MARKER_COLUMN, end),
        state,
    })
}

/// Diagnostics for one snapshot of a document's lines: two hints per open
/// task, one per completed task, anchored to the whole line.
pub fn scan<S: AsRef<str>>(lines: &[S]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let Some(marker) = scan_line(line, idx as u32) else {
            continue;
        };
        let range = Range::full_line(marker.line, line);
        diagnostics.extend(Transition::available_for(marker.state).map(|t| Diagnostic::hint(range, t)));
    }
    diagnostics
}

/// Split on `\n` or `\r\n`, keeping the trailing empty line so line numbers
/// match what an editor shows.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect()
}

pub fn scan_text(text: &str) -> Vec<Diagnostic> {
    scan(&split_lines(text))
}

pub fn markers(text: &str) -> Vec<TaskMarker> {
    split_lines(text)
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| scan_line(line, idx as u32))
        .collect()
}
