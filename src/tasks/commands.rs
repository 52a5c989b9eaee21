// File: src/tasks/commands.rs
//! Registry of task commands and the code-action round trip with a host:
//! diagnostics in, `Command` descriptors out, then a picked command back in.
use crate::error::JournalError;
use crate::tasks::actions;
use crate::tasks::types::{Diagnostic, Range, TaskEdit, Transition};
use serde::{Deserialize, Serialize};

/// What a command action gets to see when it runs.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    pub uri: &'a str,
    pub range: Range,
    pub message: &'a str,
}

pub struct CommandDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub transition: Transition,
    pub action: fn(&EditContext) -> TaskEdit,
}

impl std::fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("transition", &self.transition)
            .finish()
    }
}

fn complete_task(ctx: &EditContext) -> TaskEdit {
    actions::build_edit(Transition::Complete, ctx.range.start.line)
}

fn shift_task(ctx: &EditContext) -> TaskEdit {
    actions::build_edit(Transition::Shift, ctx.range.start.line)
}

fn reopen_task(ctx: &EditContext) -> TaskEdit {
    actions::build_edit(Transition::Reopen, ctx.range.start.line)
}

pub static COMMANDS: [CommandDefinition; 3] = [
    CommandDefinition {
        id: "journal.completeTask",
        label: "Complete task",
        transition: Transition::Complete,
        action: complete_task,
    },
    CommandDefinition {
        id: "journal.shiftTask",
        label: "Shift task to today",
        transition: Transition::Shift,
        action: shift_task,
    },
    CommandDefinition {
        id: "journal.uncompleteTask",
        label: "Reopen this task",
        transition: Transition::Reopen,
        action: reopen_task,
    },
];

/// Arguments travel as `[uri, range, message]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub title: String,
    pub command: String,
    pub arguments: (String, Range, String),
}

pub fn find_definition(id: &str) -> Option<&'static CommandDefinition> {
    COMMANDS.iter().find(|cd| cd.id == id)
}

pub fn definition_for(transition: Transition) -> Option<&'static CommandDefinition> {
    COMMANDS.iter().find(|cd| cd.transition == transition)
}

/// Commands for the diagnostics the host passes back. Dispatch is on the
/// transition tag; untagged diagnostics fall back to their message text, and
/// ones matching neither are skipped.
pub fn provide_code_actions(uri: &str, diagnostics: &[Diagnostic]) -> Vec<Command> {
    diagnostics
        .iter()
        .filter_map(|diag| {
            let Some(transition) = diag.resolved_transition() else {
                log::debug!("No command for diagnostic '{}'", diag.message);
                return None;
            };
            let Some(cd) = definition_for(transition) else {
                log::warn!("No command registered for {:?}", transition);
                return None;
            };
            Some(Command {
                title: cd.label.to_string(),
                command: cd.id.to_string(),
                arguments: (uri.to_string(), diag.range, diag.message.clone()),
            })
        })
        .collect()
}

pub fn execute_command(id: &str, arguments: &(String, Range, String)) -> Result<TaskEdit, JournalError> {
    let cd = find_definition(id).ok_or_else(|| JournalError::UnknownCommand(id.to_string()))?;
    let (uri, range, message) = arguments;
    let ctx = EditContext {
        uri,
        range: *range,
        message,
    };
    log::debug!("Executing {} on {} line {}", cd.id, ctx.uri, range.start.line);
    Ok((cd.action)(&ctx))
}
