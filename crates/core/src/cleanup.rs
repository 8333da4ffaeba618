//! Pre-run reset of a desk workspace.
//!
//! Deletion is advisory: a file that is already gone counts as removed, and any
//! other failure is recorded in the [`CleanupReport`] instead of aborting the run.
//! Only direct children of each target directory are considered.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::workspace::Workspace;

const SCREENSHOT_EXTENSIONS: &[&str] = &["png", "json"];

/// Which direct children of a directory are eligible for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFilter {
    AnyFile,
    Extensions(&'static [&'static str]),
}

impl FileFilter {
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            FileFilter::AnyFile => true,
            FileFilter::Extensions(allowed) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| allowed.iter().any(|want| ext.eq_ignore_ascii_case(want)))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleanupRule {
    pub dir: PathBuf,
    pub filter: FileFilter,
}

impl CleanupRule {
    pub fn new(dir: PathBuf, filter: FileFilter) -> Self {
        Self { dir, filter }
    }
}

/// The two rules applied before every launch.
pub fn workspace_rules(workspace: &Workspace) -> Vec<CleanupRule> {
    vec![
        CleanupRule::new(workspace.monitor_logs_dir(), FileFilter::AnyFile),
        CleanupRule::new(
            workspace.screenshots_dir(),
            FileFilter::Extensions(SCREENSHOT_EXTENSIONS),
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub missing_dirs: Vec<PathBuf>,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn removed_under(&self, dir: &Path) -> usize {
        self.removed.iter().filter(|path| path.starts_with(dir)).count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// How an individual filesystem error is treated during cleanup.
enum Tolerance {
    /// The target is already absent; that is the state cleanup wants.
    Absent,
    Failed(String),
}

impl From<&io::Error> for Tolerance {
    fn from(err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Tolerance::Absent
        } else {
            Tolerance::Failed(err.to_string())
        }
    }
}

/// Remove stale monitor logs and screenshots from `workspace`.
pub fn clean_workspace(workspace: &Workspace) -> CleanupReport {
    let mut report = CleanupReport::default();
    for rule in workspace_rules(workspace) {
        apply_rule(&rule, &mut report);
    }
    tracing::debug!(
        desk = workspace.desk().get(),
        removed = report.removed_count(),
        failures = report.failures.len(),
        "workspace cleanup finished"
    );
    report
}

pub fn apply_rule(rule: &CleanupRule, report: &mut CleanupReport) {
    let entries = match fs::read_dir(&rule.dir) {
        Ok(entries) => entries,
        Err(err) => {
            match Tolerance::from(&err) {
                Tolerance::Absent => {
                    tracing::debug!(dir = %rule.dir.display(), "cleanup target missing, skipping");
                    report.missing_dirs.push(rule.dir.clone());
                }
                Tolerance::Failed(reason) => {
                    tracing::warn!(dir = %rule.dir.display(), error = %reason, "cannot list cleanup target");
                    report.failures.push(CleanupFailure {
                        path: rule.dir.clone(),
                        reason,
                    });
                }
            }
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Tolerance::Failed(reason) = Tolerance::from(&err) {
                    report.failures.push(CleanupFailure {
                        path: rule.dir.clone(),
                        reason,
                    });
                }
                continue;
            }
        };

        let path = entry.path();
        let is_dir = entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false);
        if is_dir || !rule.filter.matches(&path) {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::trace!(path = %path.display(), "removed");
                report.removed.push(path);
            }
            Err(err) => match Tolerance::from(&err) {
                Tolerance::Absent => {}
                Tolerance::Failed(reason) => {
                    tracing::warn!(path = %path.display(), error = %reason, "could not remove stale file");
                    report.failures.push(CleanupFailure { path, reason });
                }
            },
        }
    }
}
