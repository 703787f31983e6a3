//! Persisted organizer configuration.
//!
//! The configuration is a TOML record holding the blacklist, the categories that
//! nest files into extension subfolders, and optional custom categories:
//!
//! ```toml
//! blacklisted_files = ["Thumbs.db"]
//! blacklisted_directories = ["/home/me/Downloads/keep"]
//! blacklisted_filetypes = ["tmp", "part"]
//! extension_subfolder_categories = ["Documents"]
//!
//! [[categories]]
//! name = "Code"
//! extensions = ["rs", "py"]
//! ```
//!
//! The file is created with empty arrays on first use and rewritten in full on
//! every save. Nothing is flushed implicitly; callers save after mutating.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::blacklist::{Blacklist, BlacklistAction, BlacklistChange};
use crate::error::OrganizeResult;
use crate::file_category::{Category, CategoryTable, DOCUMENTS};

const CONFIG_FILE_NAME: &str = "config.toml";
const HISTORY_FILE_NAME: &str = "last_organize.json";

/// Errors that can occur while loading or saving the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write configuration {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The durable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizerConfig {
    #[serde(flatten)]
    pub blacklist: Blacklist,

    /// Categories whose files go into an upper-cased extension subfolder.
    #[serde(default = "default_subfolder_categories")]
    pub extension_subfolder_categories: Vec<String>,

    /// Custom categories, matched before the built-in ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
}

fn default_subfolder_categories() -> Vec<String> {
    vec![DOCUMENTS.to_string()]
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            blacklist: Blacklist::default(),
            extension_subfolder_categories: default_subfolder_categories(),
            categories: Vec::new(),
        }
    }
}

impl OrganizerConfig {
    /// Category table described by this record.
    pub fn category_table(&self) -> CategoryTable {
        CategoryTable::with_custom(&self.categories, self.extension_subfolder_categories.clone())
    }
}

/// Owns the configuration and the path it persists to.
///
/// One store is opened per session and handed to whatever needs the blacklist
/// or the categories; there is no global configuration.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: OrganizerConfig,
    categories: CategoryTable,
}

impl ConfigStore {
    /// Default location of the configuration file.
    ///
    /// Uses `~/.config/dirsort/config.toml`, or `.dirsort/config.toml` under the
    /// current directory when no home directory is known.
    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) if !home.is_empty() => PathBuf::from(home)
                .join(".config")
                .join("dirsort")
                .join(CONFIG_FILE_NAME),
            _ => PathBuf::from(".dirsort").join(CONFIG_FILE_NAME),
        }
    }

    /// Opens the configuration at `path`, or at [`ConfigStore::default_path`].
    pub fn open(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load(&Self::default_path()),
        }
    }

    /// Loads the configuration, creating it with defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read,
    /// `ConfigError::Parse` if it is not a valid record and
    /// `ConfigError::Write` if a fresh file cannot be created.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "creating default configuration");
            let store = Self::from_config(path.to_path_buf(), OrganizerConfig::default());
            store.save()?;
            return Ok(store);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: OrganizerConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.blacklist = config.blacklist.normalized();

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(Self::from_config(path.to_path_buf(), config))
    }

    fn from_config(path: PathBuf, config: OrganizerConfig) -> Self {
        let categories = config.category_table();
        Self {
            path,
            config,
            categories,
        }
    }

    /// Rewrites the whole configuration file.
    pub fn save(&self) -> ConfigResult<()> {
        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::write(&self.path, content).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.config.blacklist
    }

    /// Mutable access to the blacklist. Call [`ConfigStore::save`] afterwards.
    pub fn blacklist_mut(&mut self) -> &mut Blacklist {
        &mut self.config.blacklist
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Where the log of the last organize run is kept.
    pub fn history_path(&self) -> PathBuf {
        self.path
            .parent()
            .map(|parent| parent.join(HISTORY_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(HISTORY_FILE_NAME))
    }

    /// Applies a comma separated batch of blacklist items and persists once.
    pub fn update_blacklist(
        &mut self,
        action: BlacklistAction,
        items: &str,
    ) -> OrganizeResult<Vec<BlacklistChange>> {
        let items = Blacklist::parse_batch(items)?;
        let changes = self.config.blacklist.apply(action, &items);
        self.save()?;
        Ok(changes)
    }
}
