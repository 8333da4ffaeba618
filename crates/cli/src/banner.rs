//! Operator-facing progress text. Everything here writes to a caller-supplied writer.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::cleanup::CleanupReport;
use crate::config::LaunchPlan;
use crate::launch::LaunchOutcome;
use crate::model::Port;

const HEAVY_RULE: &str = "============================================================";
const LIGHT_RULE: &str = "------------------------------------------------------------";
const INDENT: &str = "      ";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn write_header<W: Write>(mut writer: W, title: &str, root: &Path, plan: &LaunchPlan) -> Result<()> {
    writeln!(writer, "{HEAVY_RULE}")?;
    writeln!(writer, "  {title}")?;
    writeln!(
        writer,
        "  {} | port {}",
        plan.desk.display_name(),
        plan.desk.port
    )?;
    writeln!(writer, "  root:      {}", root.display())?;
    writeln!(writer, "  workspace: {}", plan.workspace.dir().display())?;
    writeln!(writer, "{HEAVY_RULE}")?;
    Ok(())
}

pub fn write_step<W: Write>(mut writer: W, step: usize, total: usize, message: &str) -> Result<()> {
    writeln!(writer, "[{step}/{total}] {message}")?;
    Ok(())
}

pub fn write_detail<W: Write>(mut writer: W, message: impl fmt::Display) -> Result<()> {
    writeln!(writer, "{INDENT}{message}")?;
    Ok(())
}

pub fn write_cleanup<W: Write>(mut writer: W, report: &CleanupReport, plan: &LaunchPlan) -> Result<()> {
    let logs = report.removed_under(&plan.workspace.monitor_logs_dir());
    let screenshots = report.removed_under(&plan.workspace.screenshots_dir());
    write_detail(&mut writer, CleanupLine::summarize(logs, screenshots))?;
    if !report.failures.is_empty() {
        write_detail(
            &mut writer,
            format!(
                "{} file{} could not be removed and {} left in place",
                report.failures.len(),
                plural(report.failures.len()),
                if report.failures.len() == 1 { "was" } else { "were" }
            ),
        )?;
    }
    Ok(())
}

pub fn write_port_warning<W: Write>(writer: W, port: Port) -> Result<()> {
    write_detail(
        writer,
        format!("warning: port {port} is already in use on 127.0.0.1; another monitor may still be running"),
    )
}

pub fn write_launch<W: Write>(mut writer: W, command_line: &str, at: DateTime<Local>) -> Result<()> {
    write_detail(&mut writer, format!("started at {}", at.format(TIMESTAMP_FORMAT)))?;
    write_detail(&mut writer, command_line)?;
    writeln!(writer, "{LIGHT_RULE}")?;
    Ok(())
}

pub fn write_exit<W: Write>(mut writer: W, plan: &LaunchPlan, outcome: &LaunchOutcome) -> Result<()> {
    writeln!(writer, "{LIGHT_RULE}")?;
    writeln!(
        writer,
        "Monitor for {} exited with code {} after {}",
        plan.desk.display_name(),
        outcome.exit_code,
        Elapsed(outcome.elapsed)
    )?;
    Ok(())
}

pub fn write_launch_failure<W: Write>(
    mut writer: W,
    plan: &LaunchPlan,
    error: &anyhow::Error,
    exit_code: i32,
) -> Result<()> {
    writeln!(
        writer,
        "Failed to start the monitor for {}: {error:#}",
        plan.desk.display_name()
    )?;
    writeln!(writer, "Exiting with code {exit_code}")?;
    Ok(())
}

enum CleanupLine {
    Removed { logs: usize, screenshots: usize },
    NothingToRemove,
}

impl CleanupLine {
    fn summarize(logs: usize, screenshots: usize) -> Self {
        if logs + screenshots > 0 {
            CleanupLine::Removed { logs, screenshots }
        } else {
            CleanupLine::NothingToRemove
        }
    }
}

impl fmt::Display for CleanupLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupLine::Removed { logs, screenshots } => {
                let total = logs + screenshots;
                write!(
                    f,
                    "removed {} stale file{} (logs: {}, screenshots: {})",
                    total,
                    plural(total),
                    logs,
                    screenshots
                )
            }
            CleanupLine::NothingToRemove => write!(f, "workspace already clean"),
        }
    }
}

struct Elapsed(Duration);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        if hours > 0 {
            write!(f, "{hours}h {minutes:02}m {seconds:02}s")
        } else if minutes > 0 {
            write!(f, "{minutes}m {seconds:02}s")
        } else {
            write!(f, "{seconds}s")
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
