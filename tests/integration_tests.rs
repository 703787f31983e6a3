/// Integration tests for dirsort
///
/// These tests drive the library end to end on real temporary directories.
///
/// Test categories:
/// 1. Organize workflows
/// 2. Blacklist behavior
/// 3. Restore and history
/// 4. Configuration persistence
/// 5. Directory queries
use dirsort::blacklist::{BlacklistAction, BlacklistKind};
use dirsort::config::ConfigStore;
use dirsort::error::OrganizeError;
use dirsort::file_organizer::{FileOrganizer, OperationLog, Organizer};
use dirsort::query::DirectoryQuery;
use dirsort::restore::{RestoreManager, RestoreOptions};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A work directory to organize plus a separate directory for the
/// configuration, so the config file is never organized itself.
struct TestFixture {
    temp_dir: TempDir,
    config_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        TestFixture {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            config_dir: TempDir::new().expect("Failed to create config directory"),
        }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.toml")
    }

    fn store(&self) -> ConfigStore {
        ConfigStore::load(&self.config_path()).expect("Failed to load config")
    }

    /// Create a file with content, creating parent directories as needed.
    fn create_file(&self, rel_path: &str, content: &[u8]) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content).expect("Failed to write file content");
    }

    fn create_text_file(&self, rel_path: &str, content: &str) {
        self.create_file(rel_path, content.as_bytes());
    }

    fn create_subdir(&self, rel_path: &str) {
        fs::create_dir_all(self.path().join(rel_path)).expect("Failed to create subdirectory");
    }

    fn create_files(&self, files: &[(&str, &[u8])]) {
        for (name, content) in files {
            self.create_file(name, content);
        }
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Relative paths of every file under the work directory, sorted.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), &mut files);
        let mut files: Vec<PathBuf> = files
            .into_iter()
            .filter_map(|p| p.strip_prefix(self.path()).ok().map(Path::to_path_buf))
            .collect();
        files.sort();
        files
    }

    fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    Self::walk_dir(&path, files);
                } else {
                    files.push(path);
                }
            }
        }
    }

    fn organize(&self, store: &ConfigStore, filter: Option<&str>) -> OperationLog {
        FileOrganizer::from_store(store)
            .organize(self.path(), filter)
            .expect("Organize failed")
    }
}

// ============================================================================
// 1. Organize workflows
// ============================================================================

#[test]
fn test_organize_basic_scenario() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("a.txt", b"text"),
        ("b.jpg", b"image"),
        ("c.unknownext", b"other"),
    ]);

    let log = fixture.organize(&fixture.store(), None);

    assert_eq!(log.len(), 3);
    fixture.assert_file_exists("Documents/TXT/a.txt");
    fixture.assert_file_exists("Images/b.jpg");
    fixture.assert_file_exists("Others/c.unknownext");
    fixture.assert_file_not_exists("a.txt");
    fixture.assert_file_not_exists("b.jpg");
    fixture.assert_file_not_exists("c.unknownext");
}

#[test]
fn test_organize_every_standard_category() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("report.pdf", b"%PDF"),
        ("letter.docx", b"docx"),
        ("photo.jpeg", b"jpeg"),
        ("song.flac", b"flac"),
        ("clip.mkv", b"mkv"),
        ("README", b"no extension"),
    ]);

    fixture.organize(&fixture.store(), None);

    assert_eq!(
        fixture.list_files_recursive(),
        vec![
            PathBuf::from("Audio/song.flac"),
            PathBuf::from("Documents/DOCX/letter.docx"),
            PathBuf::from("Documents/PDF/report.pdf"),
            PathBuf::from("Images/photo.jpeg"),
            PathBuf::from("Others/README"),
            PathBuf::from("Videos/clip.mkv"),
        ]
    );
}

#[test]
fn test_organize_pulls_files_up_from_subdirectories() {
    let fixture = TestFixture::new();
    fixture.create_text_file("nested/deep/notes.txt", "notes");
    fixture.create_text_file("nested/pic.png", "png");

    let log = fixture.organize(&fixture.store(), None);

    assert_eq!(log.len(), 2);
    fixture.assert_file_exists("Documents/TXT/notes.txt");
    fixture.assert_file_exists("Images/pic.png");
    // Emptied source folders are left alone by organize.
    fixture.assert_dir_exists("nested/deep");
}

#[test]
fn test_organize_uppercase_extension() {
    let fixture = TestFixture::new();
    fixture.create_text_file("SCAN.PDF", "pdf");
    fixture.create_text_file("Image.PNG", "png");

    fixture.organize(&fixture.store(), None);

    fixture.assert_file_exists("Documents/PDF/SCAN.PDF");
    fixture.assert_file_exists("Images/Image.PNG");
}

#[test]
fn test_organize_with_type_filter() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.pdf", b"a"), ("b.txt", b"b"), ("c.jpg", b"c")]);

    let log = fixture.organize(&fixture.store(), Some("pdf"));

    assert_eq!(log.len(), 1);
    fixture.assert_file_exists("Documents/PDF/a.pdf");
    fixture.assert_file_exists("b.txt");
    fixture.assert_file_exists("c.jpg");
}

#[test]
fn test_organize_twice_is_stable() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.txt", b"a"), ("b.mp4", b"b")]);
    let store = fixture.store();

    fixture.organize(&store, None);
    let before = fixture.list_files_recursive();
    let second = fixture.organize(&store, None);

    assert!(second.is_empty());
    assert_eq!(fixture.list_files_recursive(), before);
}

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();
    let log = fixture.organize(&fixture.store(), None);
    assert!(log.is_empty());
}

#[test]
fn test_organize_missing_directory() {
    let fixture = TestFixture::new();
    let store = fixture.store();

    let failure = FileOrganizer::from_store(&store)
        .organize(&fixture.path().join("missing"), None)
        .expect_err("Organize should fail");

    assert!(matches!(failure.error, OrganizeError::NotFound { .. }));
}

#[test]
fn test_custom_category_from_config() {
    let fixture = TestFixture::new();
    fs::write(
        fixture.config_path(),
        "[[categories]]\nname = \"Code\"\nextensions = [\"rs\"]\n",
    )
    .expect("Failed to write config");
    fixture.create_text_file("main.rs", "fn main() {}");
    fixture.create_text_file("doc.txt", "doc");

    fixture.organize(&fixture.store(), None);

    fixture.assert_file_exists("Code/main.rs");
    fixture.assert_file_exists("Documents/TXT/doc.txt");
}

// ============================================================================
// 2. Blacklist behavior
// ============================================================================

#[test]
fn test_blacklisted_name_directory_and_extension_are_untouched() {
    let fixture = TestFixture::new();
    fixture.create_text_file("keep.txt", "keep");
    fixture.create_text_file("partial.tmp", "tmp");
    fixture.create_text_file("private/secret.jpg", "secret");
    fixture.create_text_file("move.jpg", "move");

    let mut store = fixture.store();
    let private = fixture.path().join("private");
    store
        .update_blacklist(
            BlacklistAction::Add,
            &format!("keep.txt, .tmp, {}", private.display()),
        )
        .expect("Failed to update blacklist");
    assert!(
        store
            .blacklist()
            .contains(BlacklistKind::Directory, &private.to_string_lossy())
    );

    let log = fixture.organize(&store, None);

    assert_eq!(log.len(), 1);
    fixture.assert_file_exists("keep.txt");
    fixture.assert_file_exists("partial.tmp");
    fixture.assert_file_exists("private/secret.jpg");
    fixture.assert_file_exists("Images/move.jpg");
}

#[test]
fn test_directory_blacklist_is_not_substring_match() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a/x.txt", "a");
    fixture.create_text_file("ab/y.txt", "ab");

    let mut store = fixture.store();
    store
        .update_blacklist(
            BlacklistAction::Add,
            &fixture.path().join("a").to_string_lossy(),
        )
        .expect("Failed to update blacklist");

    fixture.organize(&store, None);

    fixture.assert_file_exists("a/x.txt");
    fixture.assert_file_exists("Documents/TXT/y.txt");
}

#[test]
fn test_blacklist_extension_is_case_insensitive() {
    let fixture = TestFixture::new();
    fixture.create_text_file("LOUD.LOG", "log");

    let mut store = fixture.store();
    store
        .update_blacklist(BlacklistAction::Add, ".log")
        .expect("Failed to update blacklist");

    let log = fixture.organize(&store, None);

    assert!(log.is_empty());
    fixture.assert_file_exists("LOUD.LOG");
}

// ============================================================================
// 3. Restore and history
// ============================================================================

#[test]
fn test_restore_returns_every_file() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("a.txt", b"a"),
        ("b.jpg", b"b"),
        ("sub/c.wav", b"c"),
        ("sub/deeper/d.avi", b"d"),
    ]);
    let before = fixture.list_files_recursive();

    let log = fixture.organize(&fixture.store(), None);
    assert_ne!(fixture.list_files_recursive(), before);

    let report = RestoreManager::default()
        .restore(log, fixture.path())
        .expect("Restore failed");

    assert_eq!(report.restored, 4);
    assert_eq!(fixture.list_files_recursive(), before);
    fixture.assert_file_not_exists("Documents");
    fixture.assert_file_not_exists("Images");
}

#[test]
fn test_restore_twice_is_noop() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.txt", b"a"), ("b.gif", b"b")]);

    let log = fixture.organize(&fixture.store(), None);
    let manager = RestoreManager::default();
    manager
        .restore(log.clone(), fixture.path())
        .expect("First restore failed");
    let after_first = fixture.list_files_recursive();

    let report = manager
        .restore(log, fixture.path())
        .expect("Second restore failed");

    assert_eq!(report.restored, 0);
    assert_eq!(fixture.list_files_recursive(), after_first);
}

#[test]
fn test_restore_skips_files_moved_away() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.txt", b"a"), ("b.jpg", b"b")]);

    let log = fixture.organize(&fixture.store(), None);
    fs::remove_file(fixture.path().join("Images/b.jpg")).expect("Failed to remove file");

    let report = RestoreManager::default()
        .restore(log, fixture.path())
        .expect("Restore failed");

    assert_eq!(report.restored, 1);
    assert_eq!(report.skipped, vec![fixture.path().join("Images/b.jpg")]);
    fixture.assert_file_exists("a.txt");
    fixture.assert_file_not_exists("b.jpg");
}

#[test]
fn test_restore_keeps_empty_dirs_when_asked() {
    let fixture = TestFixture::new();
    fixture.create_subdir("empty_before");
    fixture.create_text_file("a.txt", "a");

    let log = fixture.organize(&fixture.store(), None);
    RestoreManager::new(RestoreOptions {
        prune_empty_dirs: false,
    })
    .restore(log, fixture.path())
    .expect("Restore failed");

    fixture.assert_file_exists("a.txt");
    fixture.assert_dir_exists("empty_before");
    fixture.assert_dir_exists("Documents/TXT");
}

#[test]
fn test_restore_prune_removes_preexisting_empty_dirs() {
    let fixture = TestFixture::new();
    fixture.create_subdir("empty_before/inner");
    fixture.create_text_file("a.txt", "a");

    let log = fixture.organize(&fixture.store(), None);
    RestoreManager::default()
        .restore(log, fixture.path())
        .expect("Restore failed");

    fixture.assert_file_not_exists("empty_before");
    assert!(fixture.path().is_dir());
}

#[test]
fn test_history_survives_save_and_load() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.txt", b"a"), ("b.png", b"b")]);
    let store = fixture.store();

    let log = fixture.organize(&store, None);
    log.save(&store.history_path()).expect("Failed to save history");

    let loaded = OperationLog::load(&store.history_path())
        .expect("Failed to load history")
        .expect("History should exist");
    assert_eq!(loaded, log);

    RestoreManager::default()
        .restore(loaded, fixture.path())
        .expect("Restore failed");
    fixture.assert_file_exists("a.txt");
    fixture.assert_file_exists("b.png");
}

// ============================================================================
// 4. Configuration persistence
// ============================================================================

#[test]
fn test_blacklist_round_trip_through_storage() {
    let fixture = TestFixture::new();

    let mut store = fixture.store();
    store
        .update_blacklist(BlacklistAction::Add, ".tmp")
        .expect("Failed to add");
    assert!(
        fixture
            .store()
            .blacklist()
            .contains(BlacklistKind::Extension, "tmp")
    );

    let mut store = fixture.store();
    store
        .update_blacklist(BlacklistAction::Remove, ".tmp")
        .expect("Failed to remove");
    assert!(
        !fixture
            .store()
            .blacklist()
            .contains(BlacklistKind::Extension, "tmp")
    );
}

#[test]
fn test_first_load_creates_config_file() {
    let fixture = TestFixture::new();
    assert!(!fixture.config_path().exists());

    let store = fixture.store();

    assert!(fixture.config_path().is_file());
    assert!(store.blacklist().is_empty());
}

// ============================================================================
// 5. Directory queries
// ============================================================================

#[test]
fn test_stats_empty_and_single_file() {
    let fixture = TestFixture::new();
    let query = DirectoryQuery::new();

    let stats = query.stats(fixture.path()).expect("Stats failed");
    assert_eq!(
        (stats.file_count, stats.directory_count, stats.total_size),
        (0, 0, 0)
    );

    fixture.create_file("ten.bin", b"0123456789");
    let stats = query.stats(fixture.path()).expect("Stats failed");
    assert_eq!(
        (stats.file_count, stats.directory_count, stats.total_size),
        (1, 0, 10)
    );
}

#[test]
fn test_search_report_not_invoice() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("Report.pdf", b"r"), ("invoice.pdf", b"i")]);

    let results = DirectoryQuery::new()
        .search(fixture.path(), "report")
        .expect("Search failed");

    assert_eq!(results, vec![fixture.path().join("Report.pdf")]);
}

#[test]
fn test_list_after_organize_shows_category_folders() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.txt", b"a"), ("b.jpg", b"b")]);
    fixture.organize(&fixture.store(), None);

    let names: Vec<String> = DirectoryQuery::new()
        .list_children(fixture.path())
        .expect("List failed")
        .into_iter()
        .map(|child| child.name)
        .collect();

    assert_eq!(names, vec!["Documents", "Images"]);
}
