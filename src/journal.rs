/*
 * daylog/src/journal.rs
 *
 * The journal workflow: turn quick input into a page, create notes and
 * weekly pages, and run task transitions against stored documents.
 *
 * Filesystem access goes through a `DocumentStore`; the clock is read once,
 * when the journal is built, so every request in a session shares one "today".
 */

use crate::config::{CONTENT_PLACEHOLDER, Config, ConfigProvider, HEADER_PLACEHOLDER};
use crate::error::JournalError;
use crate::model::dates;
use crate::model::input::Input;
use crate::model::parser::InputParser;
use crate::paths::{EntryPaths, normalize_filename};
use crate::storage::{Document, DocumentStore};
use crate::tasks::commands::{self, Command};
use crate::tasks::{Diagnostic, Transition, actions, scanner};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use std::path::Path;

pub struct Journal<S: DocumentStore> {
    config: Config,
    parser: InputParser,
    paths: EntryPaths,
    locale: String,
    store: S,
}

impl<S: DocumentStore> Journal<S> {
    pub fn new(config: Config, store: S) -> Self {
        Self::with_today(config, store, Local::now().date_naive())
    }

    pub fn with_today(config: Config, store: S, today: NaiveDate) -> Self {
        let parser = InputParser::with_today(&config, today);
        let paths = EntryPaths::new(config.base_path(), &config.file_extension());
        let locale = config.locale();
        log::debug!(
            "Journal at {} (locale {}, today {})",
            paths.base().display(),
            locale,
            today
        );
        Self {
            config,
            parser,
            paths,
            locale,
            store,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.parser.today()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn paths(&self) -> &EntryPaths {
        &self.paths
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn parser(&self) -> &InputParser {
        &self.parser
    }

    /// The folder every page lives under.
    pub fn base_path(&self) -> &Path {
        self.paths.base()
    }

    /// The quick-input flow: resolve the day, open its page, and add the
    /// memo if there is one.
    pub fn load_page_for_input(&self, raw: &str) -> Result<Document> {
        let input = self.parser.tokenize(raw)?;
        let doc = self.page_for_day(input.target_offset())?;
        match self.render_memo(&input) {
            Some(line) => {
                log::info!("Adding memo to {}", doc.path.display());
                self.store.append_line(&doc, &line)
            }
            None => Ok(doc),
        }
    }

    /// Memo line for `input`, or `None` when it only names a day.
    ///
    /// The task flag picks the task template and is consumed; any other
    /// flags are written back as tags after the memo.
    pub fn render_memo(&self, input: &Input) -> Option<String> {
        if !input.has_memo() {
            return None;
        }
        let memo = input.memo.as_deref()?.trim();
        let is_task = input.has_flag(&self.config.task_flag);

        let mut content = memo.to_string();
        for flag in input
            .flags
            .iter()
            .filter(|f| !f.eq_ignore_ascii_case(&self.config.task_flag))
        {
            content.push(' ');
            content.push(self.config.flag_sigil);
            content.push_str(flag);
        }

        let template = if is_task {
            &self.config.task_template
        } else {
            &self.config.memo_template
        };
        Some(template.replace(CONTENT_PLACEHOLDER, &content))
    }

    pub fn date_for(&self, offset: i64) -> Result<NaiveDate, JournalError> {
        dates::add_days(self.today(), offset).ok_or_else(|| JournalError::UnresolvedInput(offset.to_string()))
    }

    pub fn header_for(&self, date: NaiveDate) -> String {
        dates::format_date(date, &self.config.header_template(), &self.locale)
    }

    /// The daily page `offset` days from today, created from the page
    /// template if it does not exist yet.
    pub fn page_for_day(&self, offset: i64) -> Result<Document> {
        let date = self.date_for(offset)?;
        let path = self.paths.daily(date);
        let content = self
            .config
            .page_template
            .replace(HEADER_PLACEHOLDER, &self.header_for(date));
        self.store.load_or_create(&path, &content)
    }

    /// A named note in today's folder.
    pub fn create_note(&self, name: &str) -> Result<Document> {
        let name = name.trim();
        if normalize_filename(name).is_empty() {
            return Err(JournalError::EmptyInput.into());
        }
        let path = self.paths.note(self.today(), name);
        let content = self.config.note_template.replace(CONTENT_PLACEHOLDER, name);
        self.store.load_or_create(&path, &content)
    }

    /// The weekly page for the ISO week containing today + `offset` weeks.
    pub fn page_for_week(&self, offset: i64) -> Result<Document> {
        let days = offset
            .checked_mul(7)
            .ok_or_else(|| JournalError::UnresolvedInput(offset.to_string()))?;
        let date = self.date_for(days)?;
        let week = date.iso_week();
        let header = format!("Week {:02}, {}", week.week(), week.year());
        let path = self.paths.weekly(date);
        let content = self.config.page_template.replace(HEADER_PLACEHOLDER, &header);
        self.store.load_or_create(&path, &content)
    }

    pub fn scan_document(&self, doc: &Document) -> Vec<Diagnostic> {
        scanner::scan(&doc.lines())
    }

    pub fn code_actions(&self, doc: &Document) -> Vec<Command> {
        commands::provide_code_actions(&document_uri(doc), &self.scan_document(doc))
    }

    /// Apply `transition` to the task on `line`, checked against the file as
    /// it is now rather than as `doc` remembers it.
    pub fn apply_transition(&self, doc: &Document, line: u32, transition: Transition) -> Result<bool> {
        let edit = actions::build_edit(transition, line);
        let changed = self.store.apply_edits(doc, &[edit])?;
        if changed {
            log::info!("{} on {}:{}", transition.label(), doc.path.display(), line + 1);
        }
        Ok(changed)
    }

    /// Run a command previously returned by [`Journal::code_actions`].
    pub fn execute(&self, doc: &Document, command: &Command) -> Result<bool> {
        let edit = commands::execute_command(&command.command, &command.arguments)?;
        self.store.apply_edits(doc, &[edit])
    }
}

pub fn document_uri(doc: &Document) -> String {
    format!("file://{}", doc.path.display())
}
