// File: src/storage.rs
// Journal documents on disk: create-if-missing, append, and locked task edits.
use crate::context::AppContext;
use crate::tasks::TaskEdit;
use crate::tasks::actions::{self, ShapeCheck};
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const LOCK_DIR_NAME: &str = "locks";

/// A journal file and the text it held when it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn lines(&self) -> Vec<&str> {
        crate::tasks::scanner::split_lines(&self.text)
    }
}

/// The document operations the journal workflow needs from its host.
pub trait DocumentStore {
    /// Open `path`, creating it with `fallback` as content if it does not exist.
    fn load_or_create(&self, path: &Path, fallback: &str) -> Result<Document>;

    /// Append `line` at the end of the document, on a line of its own.
    fn append_line(&self, doc: &Document, line: &str) -> Result<Document>;

    /// Apply task edits against the file's current content.
    /// Returns whether anything changed.
    fn apply_edits(&self, doc: &Document, edits: &[TaskEdit]) -> Result<bool>;

    /// Hand the document to the user.
    fn show(&self, doc: &Document) -> Result<()>;
}

/// Filesystem-backed documents.
///
/// Page locks live in `lock_dir`, one file per page keyed by a UUID of its
/// path, so the journal tree only ever holds the pages themselves.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    pub check: ShapeCheck,
    lock_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(lock_dir: impl Into<PathBuf>, check: ShapeCheck) -> Self {
        Self {
            check,
            lock_dir: lock_dir.into(),
        }
    }

    /// Locks under `<data_dir>/locks`, strict shape checks.
    pub fn for_context(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self::new(ctx.get_data_dir()?.join(LOCK_DIR_NAME), ShapeCheck::Strict))
    }

    pub fn with_check(mut self, check: ShapeCheck) -> Self {
        self.check = check;
        self
    }

    /// Sidecar lock file path: `config.toml` locks through `config.toml.lock`.
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Where the lock for a journal page lives.
    pub fn document_lock_path(&self, path: &Path) -> PathBuf {
        let key = Uuid::new_v5(&Uuid::NAMESPACE_URL, path.to_string_lossy().as_bytes());
        self.lock_dir.join(format!("{}.lock", key))
    }

    /// Run `f` while holding an exclusive lock on `file_path`'s sidecar.
    /// Meant for daylog's own files; pages go through [`Self::lock_document`].
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        Self::ensure_parent(file_path)?;
        Self::lock_at(&Self::get_lock_path(file_path), f)
    }

    fn lock_document<F, T>(&self, path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        Self::ensure_parent(path)?;
        let lock_path = self.document_lock_path(path);
        Self::ensure_parent(&lock_path)?;
        Self::lock_at(&lock_path, f)
    }

    fn lock_at<F, T>(lock_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        Ok(())
    }

    /// Atomic write: write to a .tmp file then rename.
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn read(path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
    }
}

impl DocumentStore for LocalStorage {
    fn load_or_create(&self, path: &Path, fallback: &str) -> Result<Document> {
        let text = self.lock_document(path, || {
            if path.exists() {
                return Self::read(path);
            }
            Self::atomic_write(path, fallback)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            log::info!("Created {}", path.display());
            Ok(fallback.to_string())
        })?;
        Ok(Document {
            path: path.to_path_buf(),
            text,
        })
    }

    fn append_line(&self, doc: &Document, line: &str) -> Result<Document> {
        let text = self.lock_document(&doc.path, || {
            let mut text = if doc.path.exists() {
                Self::read(&doc.path)?
            } else {
                String::new()
            };
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(line);
            text.push('\n');
            Self::atomic_write(&doc.path, &text)?;
            Ok(text)
        })?;
        log::debug!("Appended to {}", doc.path.display());
        Ok(Document {
            path: doc.path.clone(),
            text,
        })
    }

    fn apply_edits(&self, doc: &Document, edits: &[TaskEdit]) -> Result<bool> {
        if edits.is_empty() {
            return Ok(false);
        }
        self.lock_document(&doc.path, || {
            let current = Self::read(&doc.path)?;
            let updated = actions::apply_to_text(&current, edits, self.check)
                .with_context(|| format!("Failed to edit '{}'", doc.path.display()))?;
            if updated == current {
                return Ok(false);
            }
            Self::atomic_write(&doc.path, updated)?;
            Ok(true)
        })
    }

    fn show(&self, doc: &Document) -> Result<()> {
        println!("{}", doc.path.display());
        Ok(())
    }
}
