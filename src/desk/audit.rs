//! Append-only audit trail of desk actions.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use super::domain::Item;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Kinds of entries written to the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    Accepted,
    Rejected,
    Removed,
    Search,
    System,
    Config,
}

impl AuditAction {
    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::Accepted => "ADD-FOUND",
            AuditAction::Rejected => "QUALIFY-REJECT",
            AuditAction::Removed => "REMOVE",
            AuditAction::Search => "SEARCH",
            AuditAction::System => "SYSTEM",
            AuditAction::Config => "CONFIG",
        }
    }
}

/// Sink for audit entries so the desk can be exercised without a file.
pub trait AuditLog: Send + Sync {
    fn record(&self, action: AuditAction, summary: &str) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit log {} unavailable: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Audit log appending one line per entry to a text file.
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn record(&self, action: AuditAction, summary: &str) -> Result<(), AuditError> {
        let line = format_entry(Local::now().naive_local(), action, summary);
        let io_error = |source: io::Error| AuditError::Io {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error)?;
        writeln!(file, "{line}").map_err(io_error)
    }
}

/// `<timestamp> <ACTION> | <summary>`, flattened to a single line.
pub fn format_entry(at: NaiveDateTime, action: AuditAction, summary: &str) -> String {
    let summary = summary.replace(['\r', '\n'], " ");
    format!(
        "{} {} | {}",
        at.format(TIMESTAMP_FORMAT),
        action.label(),
        summary
    )
}

/// One-line description of an item for audit entries.
pub fn item_summary(item: &Item) -> String {
    let details = item.details();
    format!(
        "ID={} Name={} Cat={} Loc={} Val={:.2} Per={} Status={}",
        item.id(),
        details.name,
        details.category,
        details.location,
        details.estimated_value,
        details.perishable,
        item.status().label()
    )
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn entries_use_timestamp_action_and_summary() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 14)
            .and_then(|date| date.and_hms_milli_opt(9, 30, 15, 250))
            .expect("valid timestamp");
        assert_eq!(
            format_entry(at, AuditAction::Search, "Query: wallet -> 1 matches"),
            "2025-03-14T09:30:15.250 SEARCH | Query: wallet -> 1 matches"
        );
        assert_eq!(
            format_entry(at, AuditAction::Rejected, "two\nlines"),
            "2025-03-14T09:30:15.250 QUALIFY-REJECT | two lines"
        );
    }

    #[test]
    fn truncate_respects_character_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a much longer query", 10), "a much ...");
        assert_eq!(truncate("ñññññññ", 5), "ññ...");
    }

    #[test]
    fn file_log_appends_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = FileAuditLog::new(dir.path().join("audit.log"));

        log.record(AuditAction::System, "Desk opened")
            .expect("first entry");
        log.record(AuditAction::Config, "Similarity threshold set to 0.40")
            .expect("second entry");

        let contents = std::fs::read_to_string(log.path()).expect("log readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("SYSTEM | Desk opened"));
        assert!(lines[1].ends_with("CONFIG | Similarity threshold set to 0.40"));
    }

    #[test]
    fn file_log_reports_unwritable_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = FileAuditLog::new(dir.path().join("missing").join("audit.log"));
        let err = log
            .record(AuditAction::System, "Desk opened")
            .expect_err("parent directory does not exist");
        assert!(matches!(err, AuditError::Io { .. }));
    }
}
