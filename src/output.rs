//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking and formatted tables. The engines never print; everything a
//! user sees goes through [`OutputFormatter`].

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::blacklist::{Blacklist, BlacklistChange, BlacklistKind};
use crate::error::OrganizeError;
use crate::filesystem::EntryKind;
use crate::query::{ChildEntry, DirectoryStats};

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗) and suggestions
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for moves
/// - Tables for listings, statistics and the blacklist
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// OutputFormatter::success("Organized 12 files");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, to stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for `total` file moves.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("done");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let width = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &categories {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(**count, "file", "files"),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files, "file", "files"),
            width = width
        );
    }

    /// Prints the immediate children of a directory as a Name/Type/Size table.
    pub fn list_table(children: &[ChildEntry]) {
        if children.is_empty() {
            Self::info("Directory is empty.");
            return;
        }

        let width = children
            .iter()
            .map(|child| child.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Name".len());

        println!(
            "{:<width$}  {:<9}  {}",
            "Name".bold(),
            "Type".bold(),
            "Size".bold(),
            width = width
        );
        for child in children {
            let kind = match child.kind {
                EntryKind::Directory => child.kind.label().blue(),
                EntryKind::File => child.kind.label().normal(),
                EntryKind::Other => child.kind.label().dimmed(),
            };
            let size = child
                .size
                .map(|bytes| format!("{} bytes", group_digits(bytes)))
                .unwrap_or_default();
            println!("{:<width$}  {:<9}  {}", child.name, kind, size, width = width);
        }
    }

    /// Prints directory statistics.
    pub fn stats_table(stats: &DirectoryStats) {
        Self::header("DIRECTORY STATISTICS");
        println!("{:<16} {}", "Total files:", group_digits(stats.file_count).green());
        println!(
            "{:<16} {}",
            "Total folders:",
            group_digits(stats.directory_count).green()
        );
        println!(
            "{:<16} {} bytes",
            "Total size:",
            group_digits(stats.total_size).green()
        );
    }

    /// Prints search hits, one path per line.
    pub fn search_results(query: &str, results: &[PathBuf]) {
        if results.is_empty() {
            Self::warning(&format!("No files matching '{}'", query));
            return;
        }

        Self::header(&format!("Files matching '{}'", query));
        for path in results {
            println!("  {}", path.display());
        }
        Self::plain(&format!(
            "\n{} {}",
            results.len(),
            plural(results.len(), "match", "matches")
        ));
    }

    /// Prints every blacklist kind with its entries.
    pub fn blacklist_table(blacklist: &Blacklist) {
        Self::header("BLACKLIST");
        for kind in BlacklistKind::ALL {
            let entries = blacklist.entries(kind);
            println!("{}", format!("Blacklisted {}:", kind).bold());
            if entries.is_empty() {
                println!("  {}", "(none)".dimmed());
            }
            for entry in entries {
                let entry = match kind {
                    BlacklistKind::Extension => format!(".{}", entry),
                    _ => entry.clone(),
                };
                println!("  - {}", entry);
            }
        }
    }

    /// Reports the outcome of each blacklist change.
    pub fn blacklist_changes(changes: &[BlacklistChange]) {
        for change in changes {
            match change {
                BlacklistChange::Added { kind, entry } => {
                    Self::success(&format!("Added '{}' to blacklisted {}", entry, kind))
                }
                BlacklistChange::AlreadyPresent { kind, entry } => {
                    Self::warning(&format!("'{}' is already in blacklisted {}", entry, kind))
                }
                BlacklistChange::Removed { kind, entry } => {
                    Self::success(&format!("Removed '{}' from blacklisted {}", entry, kind))
                }
                BlacklistChange::NotFound { kind, item } => {
                    Self::warning(&format!("'{}' not found in blacklisted {}", item, kind))
                }
            }
        }
    }

    /// Prints an error with its title and a few hints, to stderr.
    pub fn error_report(error: &OrganizeError) {
        eprintln!("{} {}", format!("{}:", error.title()).red().bold(), error);
        eprintln!("\n{}", "Suggestions:".cyan().bold());
        for suggestion in suggestions(error) {
            eprintln!("  • {}", suggestion.green());
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

/// Hints shown under an error, chosen by its kind.
pub fn suggestions(error: &OrganizeError) -> &'static [&'static str] {
    match error {
        OrganizeError::NotFound { .. } => &[
            "Double-check the path and make sure it is correct.",
            "Verify that the file or directory still exists.",
        ],
        OrganizeError::PermissionDenied { .. } => &[
            "Check that you have permission to read and write the directory.",
            "Verify the ownership and permissions of the files involved.",
        ],
        OrganizeError::InvalidInput(_) => &[
            "Check the command arguments; run with --help for usage.",
            "Blacklist items are comma separated; extensions start with a dot.",
        ],
        OrganizeError::InvalidHistory { .. } => &[
            "The saved organize history is damaged and cannot be restored.",
            "Delete the history file to start over.",
        ],
        OrganizeError::Config(_) => &[
            "Fix the configuration file or pass another one with --config.",
            "Deleting the file recreates it with defaults on the next run.",
        ],
        OrganizeError::Io { .. } => &[
            "Check free disk space and that the paths are on a writable filesystem.",
            "Run again with --verbose for details.",
        ],
    }
}

/// Formats `n` with comma thousands separators.
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}
