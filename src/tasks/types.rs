// File: src/tasks/types.rs
//! Editor-facing shapes: positions, diagnostics, edits and task transitions.
//!
//! These mirror what a language-server host expects on the wire, so they all
//! serialize with serde and use zero-based lines and columns.
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self {
            start: Position {
                line: start_line,
                character: start_char,
            },
            end: Position {
                line: end_line,
                character: end_char,
            },
        }
    }

    /// The whole of `text` on `line`. Columns count UTF-16 units, like editors do.
    pub fn full_line(line: u32, text: &str) -> Self {
        Self::new(line, 0, line, text.encode_utf16().count() as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Open,
    Completed,
}

/// A checkbox found by the scanner. `columns` is empty (`start == end`) for
/// the `[]` form, which has no character between the brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMarker {
    pub line: u32,
    pub columns: (u32, u32),
    pub state: TaskState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Transition {
    Complete,
    Shift,
    Reopen,
}

impl Transition {
    /// Display text; also the message of the matching diagnostic.
    pub fn label(&self) -> &'static str {
        match self {
            Transition::Complete => "Complete task",
            Transition::Shift => "Shift task to today",
            Transition::Reopen => "Reopen this task",
        }
    }

    pub fn command_id(&self) -> &'static str {
        match self {
            Transition::Complete => "journal.completeTask",
            Transition::Shift => "journal.shiftTask",
            Transition::Reopen => "journal.uncompleteTask",
        }
    }

    /// Character written between the checkbox brackets.
    pub fn replacement(&self) -> char {
        match self {
            Transition::Complete => 'x',
            Transition::Shift => '>',
            Transition::Reopen => ' ',
        }
    }

    /// State a line must be in for this transition to be offered.
    pub fn source_state(&self) -> TaskState {
        match self {
            Transition::Complete | Transition::Shift => TaskState::Open,
            Transition::Reopen => TaskState::Completed,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::iter().find(|t| t.label() == label)
    }

    pub fn from_command_id(id: &str) -> Option<Self> {
        Self::iter().find(|t| t.command_id() == id)
    }

    pub fn available_for(state: TaskState) -> impl Iterator<Item = Transition> {
        Self::iter().filter(move |t| t.source_state() == state)
    }
}

/// One suggested transition for a task line.
///
/// `transition` is the dispatch key; `message` is only for display, though it
/// still equals `transition.label()` for hosts that drop unknown fields and
/// echo back only the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

impl Diagnostic {
    pub fn hint(range: Range, transition: Transition) -> Self {
        Self {
            range,
            message: transition.label().to_string(),
            severity: Severity::Hint,
            transition: Some(transition),
        }
    }

    /// The tag if present, otherwise whatever the message text names.
    pub fn resolved_transition(&self) -> Option<Transition> {
        self.transition.or_else(|| Transition::from_label(&self.message))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

/// A text edit together with the transition it performs, so the apply step
/// can check the line is still in the right state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEdit {
    pub transition: Transition,
    pub edit: TextEdit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_lookup() {
        for t in Transition::iter() {
            assert_eq!(Transition::from_label(t.label()), Some(t));
            assert_eq!(Transition::from_command_id(t.command_id()), Some(t));
        }
        assert_eq!(Transition::from_label("complete task"), None);
    }

    #[test]
    fn test_available_transitions_per_state() {
        let open: Vec<_> = Transition::available_for(TaskState::Open).collect();
        assert_eq!(open, vec![Transition::Complete, Transition::Shift]);
        let done: Vec<_> = Transition::available_for(TaskState::Completed).collect();
        assert_eq!(done, vec![Transition::Reopen]);
    }

    #[test]
    fn test_full_line_counts_utf16_units() {
        assert_eq!(Range::full_line(2, "* [ ] café"), Range::new(2, 0, 2, 10));
        assert_eq!(Range::full_line(0, "* [ ] 🥛"), Range::new(0, 0, 0, 8));
    }
}
