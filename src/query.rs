//! Read-only directory introspection: statistics, filename search and listing.
//!
//! Every call reads the disk afresh; nothing is cached.

use std::path::{Path, PathBuf};

use crate::error::{OrganizeError, OrganizeResult};
use crate::filesystem::{
    EntryKind, FileSystem, LocalFileSystem, normalize_path, read_sorted, walk,
};

/// Totals for a directory tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    pub file_count: u64,
    pub directory_count: u64,
    pub total_size: u64,
}

/// One immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes for files, `None` otherwise.
    pub size: Option<u64>,
}

pub struct DirectoryQuery<F = LocalFileSystem> {
    fs: F,
}

impl DirectoryQuery<LocalFileSystem> {
    pub fn new() -> Self {
        Self {
            fs: LocalFileSystem,
        }
    }
}

impl Default for DirectoryQuery<LocalFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> DirectoryQuery<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    /// Counts files, subdirectories and bytes below `dir`, recursively.
    ///
    /// Symbolic links are not counted at all, not even links to regular files,
    /// and their targets contribute no bytes. A walker that follows links
    /// would report those as files.
    pub fn stats(&self, dir: &Path) -> OrganizeResult<DirectoryStats> {
        let dir = self.existing_dir(dir)?;
        let mut stats = DirectoryStats::default();

        walk(&self.fs, &dir, &mut |entry| match entry.kind {
            EntryKind::File => {
                stats.file_count += 1;
                stats.total_size += entry.len;
            }
            EntryKind::Directory => stats.directory_count += 1,
            EntryKind::Other => {}
        })?;

        Ok(stats)
    }

    /// Absolute paths of files below `dir` whose name contains `query`,
    /// ignoring case. Results follow walk order.
    pub fn search(&self, dir: &Path, query: &str) -> OrganizeResult<Vec<PathBuf>> {
        if query.trim().is_empty() {
            return Err(OrganizeError::InvalidInput(
                "Search query must not be empty".to_string(),
            ));
        }
        let dir = self.existing_dir(dir)?;
        let needle = query.to_lowercase();
        let mut results = Vec::new();

        walk(&self.fs, &dir, &mut |entry| {
            if entry.kind == EntryKind::File && entry.name.to_lowercase().contains(&needle) {
                results.push(entry.path.clone());
            }
        })?;

        Ok(results)
    }

    /// Immediate children of `dir`, sorted by name.
    pub fn list_children(&self, dir: &Path) -> OrganizeResult<Vec<ChildEntry>> {
        let dir = self.existing_dir(dir)?;
        Ok(read_sorted(&self.fs, &dir)?
            .into_iter()
            .map(|entry| ChildEntry {
                size: (entry.kind == EntryKind::File).then_some(entry.len),
                name: entry.name,
                kind: entry.kind,
            })
            .collect())
    }

    fn existing_dir(&self, dir: &Path) -> OrganizeResult<PathBuf> {
        let dir = normalize_path(dir);
        if !self.fs.is_dir(&dir) {
            if self.fs.exists(&dir) {
                return Err(OrganizeError::InvalidInput(format!(
                    "{} is not a directory",
                    dir.display()
                )));
            }
            return Err(OrganizeError::NotFound { path: dir });
        }
        Ok(dir)
    }
}
