//! Blacklist of files, directories and extensions that organize must not touch.
//!
//! Items given by the user are classified into one of three kinds:
//! - starting with `.` → extension (stored lower-cased, without the dot)
//! - an existing directory → directory (stored as a normalized absolute path)
//! - anything else → exact file name
//!
//! Directory containment is decided component-wise on normalized paths, so an
//! entry `/tmp/a` covers `/tmp/a/x.txt` but not `/tmp/ab/x.txt`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OrganizeError, OrganizeResult};
use crate::filesystem::{extension_of, normalize_path};

/// The three kinds of blacklist entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlacklistKind {
    /// Exact file name.
    File,
    /// Directory path prefix.
    Directory,
    /// File extension, lower-cased, no leading dot.
    Extension,
}

impl BlacklistKind {
    pub const ALL: [BlacklistKind; 3] = [
        BlacklistKind::File,
        BlacklistKind::Directory,
        BlacklistKind::Extension,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BlacklistKind::File => "files",
            BlacklistKind::Directory => "directories",
            BlacklistKind::Extension => "filetypes",
        }
    }

    /// Canonical stored form of `item` for this kind.
    fn canonical(&self, item: &str) -> String {
        match self {
            BlacklistKind::File => item.to_string(),
            BlacklistKind::Directory => normalize_path(Path::new(item)).to_string_lossy().to_string(),
            BlacklistKind::Extension => item.trim_start_matches('.').to_lowercase(),
        }
    }
}

impl fmt::Display for BlacklistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Add or remove, as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistAction {
    Add,
    Remove,
}

impl FromStr for BlacklistAction {
    type Err = OrganizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(BlacklistAction::Add),
            "remove" => Ok(BlacklistAction::Remove),
            other => Err(OrganizeError::InvalidInput(format!(
                "Unknown blacklist action '{}'. Use 'add' or 'remove'.",
                other
            ))),
        }
    }
}

/// Outcome of a single add or remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlacklistChange {
    Added { kind: BlacklistKind, entry: String },
    AlreadyPresent { kind: BlacklistKind, entry: String },
    Removed { kind: BlacklistKind, entry: String },
    NotFound { kind: BlacklistKind, item: String },
}

/// Persisted blacklist. Serialized as three string arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blacklist {
    #[serde(rename = "blacklisted_files", default)]
    files: Vec<String>,
    #[serde(rename = "blacklisted_directories", default)]
    directories: Vec<String>,
    #[serde(rename = "blacklisted_filetypes", default)]
    extensions: Vec<String>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides which kind `item` belongs to. Directory detection looks at the
    /// disk, so the answer for a path can change over time.
    pub fn classify(item: &str) -> BlacklistKind {
        if item.starts_with('.') {
            BlacklistKind::Extension
        } else if Path::new(item).is_dir() {
            BlacklistKind::Directory
        } else {
            BlacklistKind::File
        }
    }

    /// Splits a comma separated batch into trimmed items.
    pub fn parse_batch(input: &str) -> OrganizeResult<Vec<String>> {
        let items: Vec<String> = input
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        if items.is_empty() {
            return Err(OrganizeError::InvalidInput(
                "No blacklist items given".to_string(),
            ));
        }
        if let Some(bad) = items.iter().find(|item| item.chars().all(|c| c == '.')) {
            return Err(OrganizeError::InvalidInput(format!(
                "'{}' is not a valid blacklist item",
                bad
            )));
        }
        Ok(items)
    }

    pub fn entries(&self, kind: BlacklistKind) -> &[String] {
        match kind {
            BlacklistKind::File => &self.files,
            BlacklistKind::Directory => &self.directories,
            BlacklistKind::Extension => &self.extensions,
        }
    }

    fn entries_mut(&mut self, kind: BlacklistKind) -> &mut Vec<String> {
        match kind {
            BlacklistKind::File => &mut self.files,
            BlacklistKind::Directory => &mut self.directories,
            BlacklistKind::Extension => &mut self.extensions,
        }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_empty(&self) -> bool {
        BlacklistKind::ALL
            .iter()
            .all(|kind| self.entries(*kind).is_empty())
    }

    pub fn contains(&self, kind: BlacklistKind, entry: &str) -> bool {
        self.entries(kind).iter().any(|e| e == entry)
    }

    /// Adds `item` under its classified kind.
    ///
    /// File and directory classification depends on the disk, so the same text
    /// is purged from the other of those two sets to keep every item in at most
    /// one kind.
    pub fn add(&mut self, item: &str) -> BlacklistChange {
        let kind = Self::classify(item);
        let entry = kind.canonical(item);

        if let Some(other) = Self::counterpart(kind) {
            let stale = other.canonical(item);
            self.entries_mut(other).retain(|e| *e != stale);
        }

        let entries = self.entries_mut(kind);
        if entries.contains(&entry) {
            BlacklistChange::AlreadyPresent { kind, entry }
        } else {
            tracing::debug!(%kind, %entry, "blacklist entry added");
            entries.push(entry.clone());
            BlacklistChange::Added { kind, entry }
        }
    }

    /// Removes `item`, trying its classified kind first.
    pub fn remove(&mut self, item: &str) -> BlacklistChange {
        let kind = Self::classify(item);
        let candidates = std::iter::once(kind).chain(Self::counterpart(kind));

        for candidate in candidates {
            let entry = candidate.canonical(item);
            let entries = self.entries_mut(candidate);
            if let Some(pos) = entries.iter().position(|e| *e == entry) {
                entries.remove(pos);
                tracing::debug!(kind = %candidate, %entry, "blacklist entry removed");
                return BlacklistChange::Removed {
                    kind: candidate,
                    entry,
                };
            }
        }

        BlacklistChange::NotFound {
            kind,
            item: item.to_string(),
        }
    }

    /// Applies `action` to every item of a batch, in order.
    pub fn apply(&mut self, action: BlacklistAction, items: &[String]) -> Vec<BlacklistChange> {
        items
            .iter()
            .map(|item| match action {
                BlacklistAction::Add => self.add(item),
                BlacklistAction::Remove => self.remove(item),
            })
            .collect()
    }

    /// Canonicalizes extensions and directories and drops duplicates within
    /// each kind, keeping first-seen order. Used after loading a hand-edited
    /// record; relative directories are resolved against the current directory
    /// once, here.
    pub fn normalized(mut self) -> Self {
        for ext in &mut self.extensions {
            *ext = BlacklistKind::Extension.canonical(ext);
        }
        for dir in &mut self.directories {
            if !dir.is_empty() {
                *dir = BlacklistKind::Directory.canonical(dir);
            }
        }
        for kind in BlacklistKind::ALL {
            let entries = self.entries_mut(kind);
            let mut seen: Vec<String> = Vec::with_capacity(entries.len());
            entries.retain(|e| {
                if e.is_empty() || seen.contains(e) {
                    false
                } else {
                    seen.push(e.clone());
                    true
                }
            });
        }
        self
    }

    /// One-shot exclusion check. Prefer [`BlacklistFilter`] inside loops.
    pub fn is_excluded(&self, path: &Path, file_name: &str) -> bool {
        BlacklistFilter::new(self).is_excluded(path, file_name)
    }

    fn counterpart(kind: BlacklistKind) -> Option<BlacklistKind> {
        match kind {
            BlacklistKind::File => Some(BlacklistKind::Directory),
            BlacklistKind::Directory => Some(BlacklistKind::File),
            BlacklistKind::Extension => None,
        }
    }
}

/// Exclusion check over a borrowed [`Blacklist`], with directory entries
/// normalized once up front.
pub struct BlacklistFilter<'a> {
    blacklist: &'a Blacklist,
    directories: Vec<PathBuf>,
}

impl<'a> BlacklistFilter<'a> {
    pub fn new(blacklist: &'a Blacklist) -> Self {
        let directories = blacklist
            .directories
            .iter()
            .map(|dir| normalize_path(Path::new(dir)))
            .collect();
        Self {
            blacklist,
            directories,
        }
    }

    /// True if the file at `path` named `file_name` must be left alone.
    ///
    /// Checks, in order: exact file name, containing directory, extension.
    pub fn is_excluded(&self, path: &Path, file_name: &str) -> bool {
        if self.blacklist.files.iter().any(|f| f == file_name) {
            return true;
        }

        if !self.directories.is_empty() {
            let normalized = normalize_path(path);
            if self.directories.iter().any(|dir| normalized.starts_with(dir)) {
                return true;
            }
        }

        let ext = extension_of(file_name);
        self.blacklist.extensions.iter().any(|e| *e == ext)
    }
}
