use anyhow::{Context, Result};
use daylog::cli::{self, CliCommand};
use daylog::config::Config;
use daylog::context::{AppContext, StandardContext};
use daylog::error::JournalError;
use daylog::journal::Journal;
use daylog::storage::{Document, DocumentStore, LocalStorage};
use simplelog::{ColorChoice, CombinedLogger, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let parsed = match cli::parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e.user_message());
            eprintln!("Run 'daylog --help' for usage.");
            return ExitCode::FAILURE;
        }
    };
    if parsed.command == CliCommand::Help {
        cli::print_help("daylog");
        return ExitCode::SUCCESS;
    }

    let ctx = StandardContext::new(parsed.root.clone());
    let config = Config::load_or_default(&ctx);
    let dev = config.as_ref().is_ok_and(|c| c.dev);
    init_logging(&ctx, parsed.verbose || dev);

    match config.and_then(|config| run(&ctx, config, parsed.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn init_logging(ctx: &dyn AppContext, verbose: bool) {
    let term_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = ctx.get_log_file_path()
        && let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path)
    {
        loggers.push(WriteLogger::new(LevelFilter::Info, simplelog::Config::default(), file));
    }
    // Only fails if a logger is already set.
    let _ = CombinedLogger::init(loggers);
}

fn report(err: &anyhow::Error) -> ExitCode {
    match JournalError::find_in(err) {
        Some(e) if e.is_cancel() => {
            log::debug!("Cancelled by user");
            ExitCode::SUCCESS
        }
        Some(e) => {
            log::debug!("{:#}", err);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
        None => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(ctx: &dyn AppContext, config: Config, command: CliCommand) -> Result<()> {
    let journal = Journal::new(config, LocalStorage::for_context(ctx)?);
    let store = journal.store();

    match command {
        CliCommand::Help => cli::print_help("daylog"),
        CliCommand::Day(offset) => store.show(&journal.page_for_day(offset)?)?,
        CliCommand::Open(raw) => store.show(&journal.load_page_for_input(&raw)?)?,
        CliCommand::Prompt => {
            let raw = prompt("Enter day or memo (with flags): ")?;
            store.show(&journal.load_page_for_input(&raw)?)?;
        }
        CliCommand::Note(name) => store.show(&journal.create_note(&name)?)?,
        CliCommand::Week(offset) => store.show(&journal.page_for_week(offset)?)?,
        CliCommand::Scan { file, json } => {
            let doc = read_document(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&journal.code_actions(&doc))?);
            } else {
                for diag in journal.scan_document(&doc) {
                    println!("{}:{}: {}", file.display(), diag.range.start.line + 1, diag.message);
                }
            }
        }
        CliCommand::Transition { transition, file, line } => {
            let doc = read_document(&file)?;
            if journal.apply_transition(&doc, line, transition)? {
                println!("{}: {}", transition.label(), line + 1);
            } else {
                println!("Nothing to change on line {}", line + 1);
            }
        }
        CliCommand::Config { init } => show_config(ctx, journal.config(), init)?,
        CliCommand::Dir => println!("{}", journal.base_path().display()),
    }
    Ok(())
}

fn show_config(ctx: &dyn AppContext, config: &Config, init: bool) -> Result<()> {
    let path = Config::get_path_string(ctx)?;
    if init {
        if Path::new(&path).exists() {
            println!("Config already exists at {}", path);
        } else {
            Config::default().save(ctx)?;
            println!("Wrote default config to {}", path);
        }
        return Ok(());
    }
    println!("# {}", path);
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn read_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    Ok(Document {
        path: path.to_path_buf(),
        text,
    })
}

/// Read one line from stdin. End of input counts as the user backing out.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(JournalError::Cancelled.into());
    }
    Ok(line.trim().to_string())
}
