//! dirsort - sort files into category folders by extension
//!
//! This library provides a persisted blacklist of files, directories and
//! extensions, an extension based category table, an organize engine that
//! records every move, a restore engine that replays those records backwards
//! and read-only directory queries.

pub mod blacklist;
pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod filesystem;
pub mod output;
pub mod query;
pub mod restore;

pub use blacklist::{Blacklist, BlacklistAction, BlacklistChange, BlacklistFilter, BlacklistKind};
pub use config::{ConfigError, ConfigStore, OrganizerConfig};
pub use error::{OrganizeError, OrganizeFailure, OrganizeResult};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{FileOrganizer, MoveRecord, OperationLog, Organizer, PlannedMove};
pub use filesystem::{FileSystem, LocalFileSystem};
pub use query::{ChildEntry, DirectoryQuery, DirectoryStats};
pub use restore::{RestoreManager, RestoreOptions, RestoreReport};

pub use cli::{Cli, run_cli};
