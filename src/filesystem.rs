//! Filesystem port used by the engines.
//!
//! Everything that touches the disk goes through [`FileSystem`], so the engines
//! can be exercised against a wrapper that injects failures.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{OrganizeError, OrganizeResult};

/// Kind of a directory entry. Symbolic links are reported as `Other` and are
/// never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::File => "File",
            EntryKind::Directory => "Directory",
            EntryKind::Other => "Other",
        }
    }
}

/// One entry returned by [`FileSystem::read_dir`].
#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Size in bytes; zero for anything that is not a regular file.
    pub len: u64,
}

pub trait FileSystem {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove_dir(&self, dir: &Path) -> io::Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let kind = if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::Other
            };
            let len = if kind == EntryKind::File {
                entry.metadata()?.len()
            } else {
                0
            };
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path(),
                kind,
                len,
            });
        }
        Ok(entries)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
            other => other,
        }
    }

    fn remove_dir(&self, dir: &Path) -> io::Result<()> {
        fs::remove_dir(dir)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Reads `dir` and sorts the entries by name.
pub fn read_sorted<F: FileSystem + ?Sized>(fs: &F, dir: &Path) -> OrganizeResult<Vec<DirEntryInfo>> {
    let mut entries = fs
        .read_dir(dir)
        .map_err(|e| OrganizeError::from_io(e, "Failed to read directory", dir))?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Walks `dir` recursively and calls `visit` for every entry below it.
///
/// Order is top-down: the non-directory entries of a directory come first, then
/// each subdirectory followed by its own contents. Fails on the first unreadable
/// directory.
pub fn walk<F: FileSystem + ?Sized>(
    fs: &F,
    dir: &Path,
    visit: &mut dyn FnMut(&DirEntryInfo),
) -> OrganizeResult<()> {
    let (dirs, others): (Vec<_>, Vec<_>) = read_sorted(fs, dir)?
        .into_iter()
        .partition(|entry| entry.kind == EntryKind::Directory);

    for entry in &others {
        visit(entry);
    }
    for entry in &dirs {
        visit(entry);
        walk(fs, &entry.path, visit)?;
    }
    Ok(())
}

/// Collects every regular file under `dir`, in walk order.
pub fn walk_files<F: FileSystem + ?Sized>(fs: &F, dir: &Path) -> OrganizeResult<Vec<DirEntryInfo>> {
    let mut files = Vec::new();
    walk(fs, dir, &mut |entry| {
        if entry.kind == EntryKind::File {
            files.push(entry.clone());
        }
    })?;
    Ok(files)
}

/// Makes `path` absolute against the current directory and folds `.` and `..`
/// lexically. Symbolic links are not resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Lower-cased text after the last `.` of a file name, or an empty string.
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}
