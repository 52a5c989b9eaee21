// File: ./src/cli.rs
//! Command-line argument handling shared by the binary and its tests.
use crate::error::JournalError;
use crate::tasks::Transition;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Day(i64),
    Open(String),
    /// `open` without arguments: read the input from stdin.
    Prompt,
    Note(String),
    Week(i64),
    Scan { file: PathBuf, json: bool },
    Transition { transition: Transition, file: PathBuf, line: u32 },
    Config { init: bool },
    /// Print the journal's base directory.
    Dir,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub command: CliCommand,
}

/// Parse everything after the binary name.
///
/// Global options may appear anywhere before the command. With no command
/// at all, today's page is opened. Task lines are given 1-based, as editors
/// show them, and returned 0-based.
pub fn parse_args(args: &[String]) -> Result<CliArgs, JournalError> {
    let mut root = None;
    let mut verbose = false;
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-r" | "--root" if rest.is_empty() => {
                let path = iter
                    .next()
                    .ok_or_else(|| JournalError::UnresolvedInput(arg.clone()))?;
                root = Some(PathBuf::from(path));
            }
            "-v" | "--verbose" if rest.is_empty() => verbose = true,
            _ => rest.push(arg.as_str()),
        }
    }

    let command = match rest.split_first() {
        None => CliCommand::Day(0),
        Some((&cmd, tail)) => parse_command(cmd, tail)?,
    };
    Ok(CliArgs { root, verbose, command })
}

fn parse_command(cmd: &str, tail: &[&str]) -> Result<CliCommand, JournalError> {
    let joined = || tail.join(" ");
    let command = match cmd {
        "-h" | "--help" | "help" => CliCommand::Help,
        "today" => CliCommand::Day(0),
        "yesterday" => CliCommand::Day(-1),
        "tomorrow" => CliCommand::Day(1),
        "open" if tail.is_empty() => CliCommand::Prompt,
        "open" => CliCommand::Open(joined()),
        "note" => {
            if tail.is_empty() {
                return Err(JournalError::EmptyInput);
            }
            CliCommand::Note(joined())
        }
        "week" => {
            let offset = match tail.first() {
                Some(raw) => raw
                    .trim_start_matches('+')
                    .parse()
                    .map_err(|_| JournalError::UnresolvedInput(raw.to_string()))?,
                None => 0,
            };
            CliCommand::Week(offset)
        }
        "scan" => {
            let file = tail.iter().find(|a| !a.starts_with("--")).ok_or(JournalError::EmptyInput)?;
            CliCommand::Scan {
                file: PathBuf::from(file),
                json: tail.contains(&"--json"),
            }
        }
        "complete" | "shift" | "reopen" => {
            let transition = match cmd {
                "complete" => Transition::Complete,
                "shift" => Transition::Shift,
                _ => Transition::Reopen,
            };
            let (Some(file), Some(line)) = (tail.first(), tail.get(1)) else {
                return Err(JournalError::EmptyInput);
            };
            let line: u32 = line
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| JournalError::UnresolvedInput(line.to_string()))?;
            CliCommand::Transition {
                transition,
                file: PathBuf::from(file),
                line: line - 1,
            }
        }
        "dir" => CliCommand::Dir,
        "config" => CliCommand::Config {
            init: tail.contains(&"--init"),
        },
        other => return Err(JournalError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

pub fn print_help(binary_name: &str) {
    println!(
        "Daylog v{} - A plain-text daily journal for the terminal",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--verbose] <command>", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and logs.");
    println!("    -v, --verbose         Log debug output to stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("COMMANDS:");
    println!("    today | yesterday | tomorrow   Open (or create) that day's page");
    println!("    open [input...]                Quick input: a day, a memo, or both (prompts if empty)");
    println!("    note <name...>                 Create a note in today's folder");
    println!("    week [offset]                  Open this week's page, or one offset by weeks");
    println!("    scan <file> [--json]           List task actions in a page");
    println!("    complete <file> <line>         Mark the task on <line> as done");
    println!("    shift <file> <line>            Mark the task on <line> as shifted");
    println!("    reopen <file> <line>           Reopen the completed task on <line>");
    println!("    dir                            Print the journal folder");
    println!("    config [--init]                Show the config path, or write a default config");
    println!();
    println!("QUICK INPUT SYNTAX:");
    println!("    today, yesterday, tomorrow   Relative day");
    println!("    -1, +3, 0                    Day offset from today");
    println!("    2026-03-07                   Absolute date (YYYY-MM-DD)");
    println!("    friday, next fri, last mon   Nearest, next or previous weekday");
    println!("    #tag                         Flag; #task turns the memo into a task");
    println!("    \\#text                       Escape the flag sigil");
    println!();
    println!("EXAMPLES:");
    println!("    {} open tomorrow #task call the plumber", binary_name);
    println!("    {} open next friday pay rent #home", binary_name);
    println!("    {} open task let's do this today", binary_name);
    println!("    {} complete ~/Journal/2026/10/19.md 3", binary_name);
}
