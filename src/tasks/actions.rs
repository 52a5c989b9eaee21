// File: src/tasks/actions.rs
//! Turns a chosen transition into the single-character edit that performs it.
//!
//! The checkbox prefix `* [` is fixed width, so the edit always targets
//! column 3 of the task line; the position is assumed, not searched for.
use crate::error::JournalError;
use crate::tasks::scanner::{self, MARKER_COLUMN};
use crate::tasks::types::{Range, TaskEdit, TextEdit, Transition};
use once_cell::sync::Lazy;
use regex::Regex;

// Any checkbox at all, including shifted `[>]` and empty `[]`.
static ANY_CHECKBOX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\* \[[^\]]?\]").unwrap());

/// How much of the line to verify before applying an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeCheck {
    /// The line must still be in the transition's source state.
    #[default]
    Strict,
    /// Any checkbox will do, so repeating a transition is a no-op.
    Lenient,
}

pub fn build_edit(transition: Transition, line: u32) -> TaskEdit {
    build_edit_at(transition, line, MARKER_COLUMN)
}

pub fn build_edit_at(transition: Transition, line: u32, column: u32) -> TaskEdit {
    TaskEdit {
        transition,
        edit: TextEdit {
            range: Range::new(line, column, line, column + 1),
            new_text: transition.replacement().to_string(),
        },
    }
}

/// Apply `task_edit` to the text of its target line.
///
/// An empty checkbox (`* [] a`) gets the character inserted instead of
/// replacing the closing bracket.
pub fn apply_to_line(line: &str, task_edit: &TaskEdit, check: ShapeCheck) -> Result<String, JournalError> {
    let line_no = task_edit.edit.range.start.line;
    let stale = || {
        log::warn!("Task marker on line {} changed before the edit was applied", line_no);
        JournalError::StaleMarker { line: line_no }
    };

    let shape_ok = match check {
        ShapeCheck::Strict => scanner::classify(line) == Some(task_edit.transition.source_state()),
        ShapeCheck::Lenient => ANY_CHECKBOX.is_match(line),
    };
    if !shape_ok {
        return Err(stale());
    }

    let col = task_edit.edit.range.start.character as usize;
    if !line.is_char_boundary(col) {
        return Err(stale());
    }
    let current = line[col..].chars().next().ok_or_else(stale)?;

    let mut out = String::with_capacity(line.len() + task_edit.edit.new_text.len());
    out.push_str(&line[..col]);
    out.push_str(&task_edit.edit.new_text);
    if current == ']' {
        out.push_str(&line[col..]);
    } else {
        out.push_str(&line[col + current.len_utf8()..]);
    }
    Ok(out)
}

/// Apply edits to a whole document snapshot, keeping its line endings.
pub fn apply_to_text(text: &str, edits: &[TaskEdit], check: ShapeCheck) -> Result<String, JournalError> {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    for task_edit in edits {
        let idx = task_edit.edit.range.start.line as usize;
        let Some(raw) = lines.get(idx) else {
            return Err(JournalError::StaleMarker {
                line: task_edit.edit.range.start.line,
            });
        };
        let (body, cr) = match raw.strip_suffix('\r') {
            Some(body) => (body, "\r"),
            None => (raw.as_str(), ""),
        };
        let updated = format!("{}{}", apply_to_line(body, task_edit, check)?, cr);
        lines[idx] = updated;
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_edit_targets_marker_column() {
        let e = build_edit(Transition::Complete, 5);
        assert_eq!(e.edit.range, Range::new(5, 3, 5, 4));
        assert_eq!(e.edit.new_text, "x");
        assert_eq!(build_edit(Transition::Shift, 0).edit.new_text, ">");
        assert_eq!(build_edit(Transition::Reopen, 0).edit.new_text, " ");
    }

    #[test]
    fn test_apply_each_transition() {
        let complete = build_edit(Transition::Complete, 0);
        assert_eq!(apply_to_line("* [ ] milk", &complete, ShapeCheck::Strict).unwrap(), "* [x] milk");
        let shift = build_edit(Transition::Shift, 0);
        assert_eq!(apply_to_line("* [ ] milk", &shift, ShapeCheck::Strict).unwrap(), "* [>] milk");
        let reopen = build_edit(Transition::Reopen, 0);
        assert_eq!(apply_to_line("* [X] milk", &reopen, ShapeCheck::Strict).unwrap(), "* [ ] milk");
    }

    #[test]
    fn test_apply_to_empty_checkbox_inserts() {
        let complete = build_edit(Transition::Complete, 0);
        assert_eq!(apply_to_line("* [] milk", &complete, ShapeCheck::Strict).unwrap(), "* [x] milk");
    }

    #[test]
    fn test_second_apply_strict_is_stale() {
        let complete = build_edit(Transition::Complete, 5);
        let once = apply_to_line("* [ ] milk", &complete, ShapeCheck::Strict).unwrap();
        assert_eq!(
            apply_to_line(&once, &complete, ShapeCheck::Strict),
            Err(JournalError::StaleMarker { line: 5 })
        );
    }

    #[test]
    fn test_second_apply_lenient_is_noop() {
        let complete = build_edit(Transition::Complete, 5);
        let once = apply_to_line("* [ ] milk", &complete, ShapeCheck::Lenient).unwrap();
        let twice = apply_to_line(&once, &complete, ShapeCheck::Lenient).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_lenient_still_rejects_non_tasks() {
        let complete = build_edit(Transition::Complete, 0);
        assert!(apply_to_line("plain text", &complete, ShapeCheck::Lenient).is_err());
    }

    #[test]
    fn test_apply_to_text_keeps_crlf() {
        let text = "# Day\r\n* [ ] a\r\n* [x] b\r\n";
        let out = apply_to_text(
            text,
            &[build_edit(Transition::Complete, 1), build_edit(Transition::Reopen, 2)],
            ShapeCheck::Strict,
        )
        .unwrap();
        assert_eq!(out, "# Day\r\n* [x] a\r\n* [ ] b\r\n");

        assert_eq!(
            apply_to_text("* [ ] a", &[build_edit(Transition::Complete, 9)], ShapeCheck::Strict),
            Err(JournalError::StaleMarker { line: 9 })
        );
    }
}
