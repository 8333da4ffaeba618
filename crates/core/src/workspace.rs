use std::path::{Path, PathBuf};

use crate::model::DeskId;

const TEMP_DIR: &str = "temp";
const LOGS_DIR: &str = "logs";
const MONITOR_LOGS_DIR: &str = "monitor";
const SCREENSHOTS_DIR: &str = "screenshots";

/// Per-desk scratch area owned by the monitor: `<root>/temp/desk_<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    desk: DeskId,
    dir: PathBuf,
}

impl Workspace {
    pub fn for_desk(root: &Path, desk: DeskId) -> Self {
        Self {
            desk,
            dir: root.join(Self::relative_dir(desk)),
        }
    }

    /// Workspace location relative to the launcher root.
    pub fn relative_dir(desk: DeskId) -> PathBuf {
        Path::new(TEMP_DIR).join(format!("desk_{desk}"))
    }

    pub fn desk(&self) -> DeskId {
        self.desk
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn monitor_logs_dir(&self) -> PathBuf {
        self.dir.join(LOGS_DIR).join(MONITOR_LOGS_DIR)
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.dir.join(SCREENSHOTS_DIR)
    }
}
