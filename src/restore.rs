/// Restore functionality for reverting an organize run.
///
/// This module moves files back to where an [`OperationLog`] says they came
/// from, then optionally prunes directories left empty under the organized root.
///
/// Pruning removes every empty directory below the root, including ones this
/// tool never created. It is on by default and can be switched off with
/// [`RestoreOptions::prune_empty_dirs`].
use std::path::{Path, PathBuf};

use crate::error::{OrganizeError, OrganizeResult};
use crate::file_organizer::OperationLog;
use crate::filesystem::{EntryKind, FileSystem, LocalFileSystem, normalize_path, read_sorted};

/// Options for a restore run.
#[derive(Debug, Clone, Copy)]
pub struct RestoreOptions {
    /// Remove empty directories under the root after moving files back.
    pub prune_empty_dirs: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            prune_empty_dirs: true,
        }
    }
}

/// Represents the result of a restore.
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Number of files moved back.
    pub restored: usize,
    /// Recorded destinations that no longer exist.
    pub skipped: Vec<PathBuf>,
    /// Directories removed by the empty-directory prune, deepest first.
    pub removed_dirs: Vec<PathBuf>,
}

impl RestoreReport {
    /// Returns the total number of records processed.
    pub fn total_processed(&self) -> usize {
        self.restored + self.skipped.len()
    }
}

/// Replays operation logs backwards.
pub struct RestoreManager<F = LocalFileSystem> {
    fs: F,
    options: RestoreOptions,
}

impl RestoreManager<LocalFileSystem> {
    pub fn new(options: RestoreOptions) -> Self {
        Self::with_fs(LocalFileSystem, options)
    }
}

impl Default for RestoreManager<LocalFileSystem> {
    fn default() -> Self {
        Self::new(RestoreOptions::default())
    }
}

impl<F: FileSystem> RestoreManager<F> {
    pub fn with_fs(fs: F, options: RestoreOptions) -> Self {
        Self { fs, options }
    }

    /// Undoes the moves recorded in `log` under `root`.
    ///
    /// Records are replayed newest first. A record whose destination has
    /// vanished is skipped without error. The log is consumed; an empty log
    /// only triggers the prune.
    ///
    /// # Errors
    ///
    /// Stops at the first move or directory removal that fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::file_organizer::OperationLog;
    /// use dirsort::restore::RestoreManager;
    /// use std::path::Path;
    ///
    /// let log = OperationLog::load(Path::new("/tmp/last_organize.json"))
    ///     .expect("Failed to read history")
    ///     .expect("Nothing to restore");
    /// let root = log.root.clone();
    /// let report = RestoreManager::default().restore(log, &root);
    /// match report {
    ///     Ok(report) => println!("Restored {} files", report.restored),
    ///     Err(e) => eprintln!("Restore failed: {}", e),
    /// }
    /// ```
    pub fn restore(&self, log: OperationLog, root: &Path) -> OrganizeResult<RestoreReport> {
        let mut report = RestoreReport::default();

        for record in log.records.into_iter().rev() {
            if !self.fs.exists(&record.new_path) {
                tracing::debug!(path = %record.new_path.display(), "destination vanished, skipping");
                report.skipped.push(record.new_path);
                continue;
            }

            if let Some(parent) = record.original_path.parent()
                && !self.fs.is_dir(parent)
            {
                self.fs
                    .create_dir_all(parent)
                    .map_err(|e| OrganizeError::from_io(e, "Failed to create directory", parent))?;
            }

            self.fs
                .rename(&record.new_path, &record.original_path)
                .map_err(|e| OrganizeError::from_io(e, "Failed to restore", &record.new_path))?;

            tracing::debug!(
                from = %record.new_path.display(),
                to = %record.original_path.display(),
                "restored"
            );
            report.restored += 1;
        }

        if self.options.prune_empty_dirs {
            let root = normalize_path(root);
            if self.fs.is_dir(&root) {
                self.prune_empty_dirs(&root, &mut report.removed_dirs)?;
            }
        }

        tracing::info!(
            restored = report.restored,
            skipped = report.skipped.len(),
            pruned = report.removed_dirs.len(),
            "restore finished"
        );
        Ok(report)
    }

    /// Removes empty directories below `dir`, post-order. Returns whether `dir`
    /// itself ended up empty. `dir` is never removed here; its parent decides.
    fn prune_empty_dirs(&self, dir: &Path, removed: &mut Vec<PathBuf>) -> OrganizeResult<bool> {
        let mut empty = true;

        for entry in read_sorted(&self.fs, dir)? {
            if entry.kind != EntryKind::Directory {
                empty = false;
                continue;
            }

            if self.prune_empty_dirs(&entry.path, removed)? {
                self.fs
                    .remove_dir(&entry.path)
                    .map_err(|e| OrganizeError::from_io(e, "Failed to remove directory", &entry.path))?;
                tracing::debug!(path = %entry.path.display(), "removed empty directory");
                removed.push(entry.path);
            } else {
                empty = false;
            }
        }

        Ok(empty)
    }
}
