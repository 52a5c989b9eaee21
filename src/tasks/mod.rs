// File: ./src/tasks/mod.rs
pub mod actions;
pub mod commands;
pub mod scanner;
pub mod types;

pub use actions::{ShapeCheck, build_edit};
pub use commands::{COMMANDS, Command, CommandDefinition};
pub use types::{Diagnostic, Range, TaskEdit, TaskMarker, TaskState, TextEdit, Transition};
