//! Command-line interface module for dirsort.
//!
//! This module handles all CLI-related functionality:
//! - Argument parsing with clap
//! - Opening the configuration store
//! - Dispatching to the organize, restore and query engines
//! - Persisting the history of the last organize run

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::blacklist::BlacklistAction;
use crate::config::ConfigStore;
use crate::error::OrganizeResult;
use crate::file_organizer::{FileOrganizer, OperationLog, PlannedMove};
use crate::output::OutputFormatter;
use crate::query::DirectoryQuery;
use crate::restore::{RestoreManager, RestoreOptions};

/// Sort files into category folders by extension, and put them back.
#[derive(Debug, Parser)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// Configuration file (default: ~/.config/dirsort/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Move files into category folders
    Organize {
        /// Directory to organize
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Only organize files with this extension (e.g. pdf or .pdf)
        #[arg(long = "type", value_name = "EXT")]
        file_type: Option<String>,

        /// Show what would be moved without moving anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List the immediate contents of a directory
    List {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Find files whose name contains QUERY
    Search {
        query: String,

        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Undo the last organize run
    Restore {
        /// Leave empty directories in place
        #[arg(long)]
        keep_empty_dirs: bool,
    },

    /// Add or remove blacklist entries
    Blacklist {
        /// add or remove
        action: String,

        /// Comma separated items: .ext, a directory path, or a file name
        items: String,
    },

    /// Show the blacklist
    ShowBlacklist,

    /// Show file, folder and size totals for a directory
    Stats {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

/// Runs a parsed command line.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use dirsort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["dirsort", "stats", "/tmp"]);
/// if let Err(e) = run_cli(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: Cli) -> OrganizeResult<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Organize {
            dir,
            file_type,
            dry_run,
        } => {
            let store = ConfigStore::open(config_path)?;
            if dry_run {
                organize_dry_run(&store, &dir, file_type.as_deref())
            } else {
                organize_directory(&store, &dir, file_type.as_deref())
            }
        }
        Command::List { dir } => {
            let children = DirectoryQuery::new().list_children(&dir)?;
            OutputFormatter::list_table(&children);
            Ok(())
        }
        Command::Search { query, dir } => {
            let results = DirectoryQuery::new().search(&dir, &query)?;
            OutputFormatter::search_results(&query, &results);
            Ok(())
        }
        Command::Stats { dir } => {
            let stats = DirectoryQuery::new().stats(&dir)?;
            OutputFormatter::stats_table(&stats);
            Ok(())
        }
        Command::Restore { keep_empty_dirs } => {
            let store = ConfigStore::open(config_path)?;
            restore_last(
                &store,
                RestoreOptions {
                    prune_empty_dirs: !keep_empty_dirs,
                },
            )
        }
        Command::Blacklist { action, items } => {
            let action: BlacklistAction = action.parse()?;
            let mut store = ConfigStore::open(config_path)?;
            let changes = store.update_blacklist(action, &items)?;
            OutputFormatter::blacklist_changes(&changes);
            Ok(())
        }
        Command::ShowBlacklist => {
            let store = ConfigStore::open(config_path)?;
            OutputFormatter::blacklist_table(store.blacklist());
            Ok(())
        }
    }
}

/// Organizes `dir` and saves the log for a later restore.
///
/// When a move fails the moves made so far are still saved, so `restore` can
/// undo them, and the error is returned.
fn organize_directory(store: &ConfigStore, dir: &Path, file_type: Option<&str>) -> OrganizeResult<()> {
    let organizer = FileOrganizer::from_store(store);
    let plan = organizer.plan(dir, file_type)?;

    if plan.is_empty() {
        OutputFormatter::info("No files to organize.");
        return Ok(());
    }

    OutputFormatter::info(&format!("Organizing contents of: {}", dir.display()));
    let counts = category_counts(&plan);
    let pb = OutputFormatter::create_progress_bar(plan.len() as u64);

    let result = organizer.execute_with(dir, plan, |record| {
        pb.set_message(record.category.clone());
        pb.inc(1);
    });

    let history = store.history_path();
    match result {
        Ok(log) => {
            pb.finish_and_clear();
            log.save(&history)?;
            OutputFormatter::summary_table(&counts, log.len());
            OutputFormatter::success(&format!("Organized {} files", log.len()));
            OutputFormatter::plain("Use 'dirsort restore' to revert these changes.");
            Ok(())
        }
        Err(failure) => {
            pb.abandon();
            if !failure.partial_log.is_empty() {
                failure.partial_log.save(&history)?;
                OutputFormatter::warning(&format!(
                    "{} files were moved before the failure; 'dirsort restore' reverts them.",
                    failure.partial_log.len()
                ));
            }
            Err(failure.into_error())
        }
    }
}

/// Shows the plan without moving anything or writing history.
fn organize_dry_run(store: &ConfigStore, dir: &Path, file_type: Option<&str>) -> OrganizeResult<()> {
    let plan = FileOrganizer::from_store(store).plan(dir, file_type)?;

    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", dir.display()));
    if plan.is_empty() {
        OutputFormatter::info("No files to organize.");
        return Ok(());
    }

    for planned in &plan {
        OutputFormatter::plain(&format!(
            " - {} → {}",
            planned.source.display(),
            planned.destination.display()
        ));
    }

    OutputFormatter::summary_table(&category_counts(&plan), plan.len());
    OutputFormatter::dry_run_notice("No files were modified.");
    Ok(())
}

/// Restores the saved log and deletes it once the restore succeeded.
fn restore_last(store: &ConfigStore, options: RestoreOptions) -> OrganizeResult<()> {
    let history = store.history_path();
    let Some(log) = OperationLog::load(&history)? else {
        OutputFormatter::info("Nothing to restore.");
        return Ok(());
    };

    let root = log.root.clone();
    OutputFormatter::info(&format!("Restoring contents of: {}", root.display()));
    let report = RestoreManager::new(options).restore(log, &root)?;
    OperationLog::delete(&history)?;

    OutputFormatter::success(&format!("Restored {} files", report.restored));
    if !report.skipped.is_empty() {
        OutputFormatter::warning(&format!(
            "Skipped {} files that are no longer where they were moved:",
            report.skipped.len()
        ));
        for path in &report.skipped {
            OutputFormatter::plain(&format!("  - {}", path.display()));
        }
    }
    if !report.removed_dirs.is_empty() {
        OutputFormatter::plain(&format!(
            "Removed {} empty directories",
            report.removed_dirs.len()
        ));
    }
    Ok(())
}

fn category_counts(plan: &[PlannedMove]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for planned in plan {
        *counts.entry(planned.category.clone()).or_insert(0) += 1;
    }
    counts
}
