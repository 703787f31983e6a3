/// File organization engine.
///
/// This module walks a directory tree, decides for each regular file whether it
/// is blacklisted and where it belongs, moves it into its category folder under
/// the organized root and records every move in an [`OperationLog`] so the run
/// can be undone.
///
/// Organizing is split into a read-only [`FileOrganizer::plan`] and an
/// [`FileOrganizer::execute`] step. The plan is computed from a snapshot of the
/// tree, so folders created while moving are never walked in the same run.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::blacklist::{Blacklist, BlacklistFilter};
use crate::config::ConfigStore;
use crate::error::{OrganizeError, OrganizeFailure, OrganizeResult};
use crate::file_category::CategoryTable;
use crate::filesystem::{FileSystem, LocalFileSystem, extension_of, normalize_path, walk_files};

/// A single successful move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Absolute path of the file before organization.
    pub original_path: PathBuf,
    /// Absolute path of the file after organization.
    pub new_path: PathBuf,
    /// The category the file was moved to.
    pub category: String,
}

/// Ordered record of the moves performed by one organize run.
///
/// The log belongs to whoever ran organize; restoring consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLog {
    /// RFC 3339 timestamp of when the organization started.
    pub timestamp: String,
    /// The directory that was organized.
    pub root: PathBuf,
    /// Moves in the order they happened.
    pub records: Vec<MoveRecord>,
}

impl OperationLog {
    /// Creates an empty log for `root`.
    pub fn new(root: PathBuf) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            root,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoveRecord> {
        self.records.iter()
    }

    /// Writes this log to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> OrganizeResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| OrganizeError::InvalidHistory {
            path: path.to_path_buf(),
            reason: format!("JSON serialization failed: {}", e),
        })?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| OrganizeError::from_io(e, "Failed to create", parent))?;
        }

        fs::write(path, json).map_err(|e| OrganizeError::from_io(e, "Failed to write history", path))
    }

    /// Loads a log saved with [`OperationLog::save`], if one exists.
    pub fn load(path: &Path) -> OrganizeResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)
            .map_err(|e| OrganizeError::from_io(e, "Failed to read history", path))?;

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| OrganizeError::InvalidHistory {
                path: path.to_path_buf(),
                reason: format!("JSON parse error: {}", e),
            })
    }

    /// Deletes a saved log. Missing files are fine.
    pub fn delete(path: &Path) -> OrganizeResult<()> {
        if path.exists() {
            fs::remove_file(path)
                .map_err(|e| OrganizeError::from_io(e, "Failed to delete history", path))?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a OperationLog {
    type Item = &'a MoveRecord;
    type IntoIter = std::slice::Iter<'a, MoveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A move that organize intends to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    /// Category folder, including the extension subfolder when one applies.
    pub folder: PathBuf,
    pub destination: PathBuf,
    pub category: String,
}

/// Something that can organize a directory.
pub trait Organizer {
    /// Organizes `root`, optionally only files with extension `extension_filter`.
    ///
    /// On failure the moves that already happened are returned inside the
    /// [`OrganizeFailure`] so they can still be undone.
    fn organize(
        &self,
        root: &Path,
        extension_filter: Option<&str>,
    ) -> Result<OperationLog, OrganizeFailure>;
}

/// Moves files into category folders according to a blacklist and a category
/// table.
pub struct FileOrganizer<'a, F = LocalFileSystem> {
    fs: F,
    blacklist: &'a Blacklist,
    categories: &'a CategoryTable,
    /// Files never moved regardless of the blacklist, normalized.
    protected: Vec<PathBuf>,
}

impl<'a> FileOrganizer<'a, LocalFileSystem> {
    pub fn new(blacklist: &'a Blacklist, categories: &'a CategoryTable) -> Self {
        Self::with_fs(LocalFileSystem, blacklist, categories)
    }

    /// Organizer using the blacklist and categories held by `store`. The
    /// configuration and history files of the store are never moved.
    pub fn from_store(store: &'a ConfigStore) -> Self {
        Self::new(store.blacklist(), store.categories())
            .with_protected_paths([store.path().to_path_buf(), store.history_path()])
    }
}

impl<'a, F: FileSystem> FileOrganizer<'a, F> {
    pub fn with_fs(fs: F, blacklist: &'a Blacklist, categories: &'a CategoryTable) -> Self {
        Self {
            fs,
            blacklist,
            categories,
            protected: Vec::new(),
        }
    }

    /// Adds files that organize must leave in place.
    pub fn with_protected_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.protected
            .extend(paths.into_iter().map(|path| normalize_path(&path)));
        self
    }

    /// Computes every move organize would perform, without touching the disk.
    ///
    /// Files are visited top-down. A file is skipped when it is blacklisted,
    /// when it does not match `extension_filter`, or when it already sits at its
    /// destination.
    ///
    /// # Errors
    ///
    /// `NotFound` if `root` does not exist, `InvalidInput` if it is not a
    /// directory, or the first error raised while reading the tree.
    pub fn plan(&self, root: &Path, extension_filter: Option<&str>) -> OrganizeResult<Vec<PlannedMove>> {
        let root = self.validate_root(root)?;
        let filter = extension_filter
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty());
        let blacklist = BlacklistFilter::new(self.blacklist);

        let mut planned = Vec::new();
        for file in walk_files(&self.fs, &root)? {
            if self.protected.contains(&file.path) {
                tracing::debug!(path = %file.path.display(), "skipping protected file");
                continue;
            }
            if blacklist.is_excluded(&file.path, &file.name) {
                tracing::debug!(path = %file.path.display(), "skipping blacklisted file");
                continue;
            }

            let ext = extension_of(&file.name);
            if let Some(filter) = &filter
                && *filter != ext
            {
                continue;
            }

            let (category, folder) = self.categories.destination_folder(&root, &ext);
            let destination = folder.join(&file.name);
            if destination == file.path {
                tracing::debug!(path = %file.path.display(), "already organized");
                continue;
            }

            planned.push(PlannedMove {
                source: file.path,
                folder,
                destination,
                category,
            });
        }

        Ok(planned)
    }

    /// Performs a plan, calling `on_move` after each successful move.
    ///
    /// Stops at the first failure; the returned [`OrganizeFailure`] carries the
    /// moves made so far.
    pub fn execute_with(
        &self,
        root: &Path,
        plan: Vec<PlannedMove>,
        mut on_move: impl FnMut(&MoveRecord),
    ) -> Result<OperationLog, OrganizeFailure> {
        let mut log = OperationLog::new(normalize_path(root));

        for planned in plan {
            match self.move_file(planned) {
                Ok(record) => {
                    on_move(&record);
                    log.push(record);
                }
                Err(error) => {
                    tracing::warn!(%error, moved = log.len(), "organize aborted");
                    return Err(OrganizeFailure::new(error, log));
                }
            }
        }

        tracing::info!(moved = log.len(), root = %log.root.display(), "organize finished");
        Ok(log)
    }

    /// Performs a plan.
    pub fn execute(&self, root: &Path, plan: Vec<PlannedMove>) -> Result<OperationLog, OrganizeFailure> {
        self.execute_with(root, plan, |_| {})
    }

    /// Creates the destination folder if needed and moves one file.
    fn move_file(&self, planned: PlannedMove) -> OrganizeResult<MoveRecord> {
        if !self.fs.is_dir(&planned.folder) {
            self.fs
                .create_dir_all(&planned.folder)
                .map_err(|e| OrganizeError::from_io(e, "Failed to create directory", &planned.folder))?;
        }

        self.fs
            .rename(&planned.source, &planned.destination)
            .map_err(|e| OrganizeError::from_io(e, "Failed to move", &planned.source))?;

        tracing::debug!(
            from = %planned.source.display(),
            to = %planned.destination.display(),
            "moved"
        );

        Ok(MoveRecord {
            original_path: planned.source,
            new_path: planned.destination,
            category: planned.category,
        })
    }

    fn validate_root(&self, root: &Path) -> OrganizeResult<PathBuf> {
        let root = normalize_path(root);
        if !self.fs.exists(&root) {
            return Err(OrganizeError::NotFound { path: root });
        }
        if !self.fs.is_dir(&root) {
            return Err(OrganizeError::InvalidInput(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(root)
    }
}

impl<F: FileSystem> Organizer for FileOrganizer<'_, F> {
    fn organize(
        &self,
        root: &Path,
        extension_filter: Option<&str>,
    ) -> Result<OperationLog, OrganizeFailure> {
        let plan = self
            .plan(root, extension_filter)
            .map_err(|error| OrganizeFailure::new(error, OperationLog::new(normalize_path(root))))?;
        self.execute(root, plan)
    }
}
