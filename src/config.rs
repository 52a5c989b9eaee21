// File: ./src/config.rs
// Handles configuration loading, saving, validation and defaults.
use crate::context::AppContext;
use crate::model::dates::DEFAULT_LOCALE;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const HEADER_PLACEHOLDER: &str = "{header}";
pub const CONTENT_PLACEHOLDER: &str = "{content}";

fn default_ext() -> String {
    "md".to_string()
}
fn default_header_template() -> String {
    "%A, %B %-d, %Y".to_string()
}
fn default_page_template() -> String {
    "# {header}\n\n".to_string()
}
fn default_note_template() -> String {
    "# {content}\n\n".to_string()
}
fn default_memo_template() -> String {
    "- {content}".to_string()
}
fn default_task_template() -> String {
    "* [ ] {content}".to_string()
}
fn default_task_flag() -> String {
    "task".to_string()
}
fn default_flag_sigil() -> char {
    '#'
}

/// Lookups the journal workflow needs from its host.
pub trait ConfigProvider {
    fn base_path(&self) -> PathBuf;
    fn file_extension(&self) -> String;
    fn locale(&self) -> String;
    fn header_template(&self) -> String;
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Journal root. Empty means `~/Journal`.
    #[serde(default)]
    pub base: String,
    #[serde(default = "default_ext")]
    pub ext: String,
    /// Empty means the system locale.
    #[serde(default)]
    pub locale: String,
    #[serde(default = "default_header_template")]
    pub header_template: String,
    #[serde(default = "default_page_template")]
    pub page_template: String,
    #[serde(default = "default_note_template")]
    pub note_template: String,
    #[serde(default = "default_memo_template")]
    pub memo_template: String,
    #[serde(default = "default_task_template")]
    pub task_template: String,
    #[serde(default = "default_task_flag")]
    pub task_flag: String,
    #[serde(default = "default_flag_sigil")]
    pub flag_sigil: char,
    #[serde(default)]
    pub dev: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base: String::new(),
            // Match the serde defaults
            ext: default_ext(),
            locale: String::new(),
            header_template: default_header_template(),
            page_template: default_page_template(),
            note_template: default_note_template(),
            memo_template: default_memo_template(),
            task_template: default_task_template(),
            task_flag: default_task_flag(),
            flag_sigil: default_flag_sigil(),
            dev: false,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading, parsing or validation fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e))?;
        Ok(config)
    }

    /// Load, or fall back to defaults when no config file exists yet.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Reject settings that would only fail later, halfway through writing a page.
    pub fn validate(&self) -> Result<()> {
        if self.file_extension().is_empty() {
            anyhow::bail!("'ext' must not be empty");
        }
        if !self.page_template.contains(HEADER_PLACEHOLDER) {
            anyhow::bail!("'page_template' must contain {}", HEADER_PLACEHOLDER);
        }
        for (name, tpl) in [
            ("note_template", &self.note_template),
            ("memo_template", &self.memo_template),
            ("task_template", &self.task_template),
        ] {
            if !tpl.contains(CONTENT_PLACEHOLDER) {
                anyhow::bail!("'{}' must contain {}", name, CONTENT_PLACEHOLDER);
            }
        }
        if self.flag_sigil.is_whitespace() || self.flag_sigil.is_alphanumeric() || self.flag_sigil == '\\' {
            anyhow::bail!("'flag_sigil' must be a symbol, got '{}'", self.flag_sigil);
        }
        if self.task_flag.trim().is_empty() {
            anyhow::bail!("'task_flag' must not be empty");
        }
        Ok(())
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}

impl ConfigProvider for Config {
    fn base_path(&self) -> PathBuf {
        if !self.base.trim().is_empty() {
            return PathBuf::from(self.base.trim());
        }
        UserDirs::new()
            .map(|dirs| dirs.home_dir().join("Journal"))
            .unwrap_or_else(|| PathBuf::from("Journal"))
    }

    fn file_extension(&self) -> String {
        self.ext.trim().trim_start_matches('.').to_string()
    }

    fn locale(&self) -> String {
        if !self.locale.trim().is_empty() {
            return self.locale.trim().to_string();
        }
        sys_locale::get_locale().unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }

    fn header_template(&self) -> String {
        self.header_template.clone()
    }
}
