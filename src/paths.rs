// File: src/paths.rs
use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};

/// Builds the on-disk location of every kind of journal entry.
#[derive(Debug, Clone)]
pub struct EntryPaths {
    base: PathBuf,
    ext: String,
}

impl EntryPaths {
    pub fn new(base: impl Into<PathBuf>, ext: &str) -> Self {
        Self {
            base: base.into(),
            ext: ext.trim_start_matches('.').to_string(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `base/YYYY/MM/DD.ext`
    pub fn daily(&self, date: NaiveDate) -> PathBuf {
        self.month_dir(date)
            .join(format!("{:02}", date.day()))
            .with_extension(&self.ext)
    }

    /// `base/YYYY/MM/DD/<name>.ext`
    pub fn note(&self, date: NaiveDate, name: &str) -> PathBuf {
        self.month_dir(date)
            .join(format!("{:02}", date.day()))
            .join(format!("{}.{}", normalize_filename(name), self.ext))
    }

    /// `base/YYYY/week-WW.ext`, using the ISO week and its year.
    pub fn weekly(&self, date: NaiveDate) -> PathBuf {
        let week = date.iso_week();
        self.base
            .join(format!("{:04}", week.year()))
            .join(format!("week-{:02}.{}", week.week(), self.ext))
    }

    fn month_dir(&self, date: NaiveDate) -> PathBuf {
        self.base
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
    }
}

/// Lowercase, with every run of non-alphanumeric characters collapsed into
/// one `_` and none at either end. `"Meeting: Q3 / Budget!"` becomes
/// `meeting_q3_budget`.
pub fn normalize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
