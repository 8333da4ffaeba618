use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{DeskId, Port};

/// Exit code reported when the interpreter or script cannot be found.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code reported when the interpreter or script is not executable.
pub const EXIT_PERMISSION_DENIED: i32 = 126;
/// Exit code reported for any other failure to start or wait on the monitor.
pub const EXIT_LAUNCH_FAILED: i32 = 1;

#[derive(Debug, Error)]
pub enum ParseConfigError {
    #[error("invalid desk id `{0}` (expected a positive integer)")]
    InvalidDesk(String),
    #[error("invalid port `{0}` (expected 1-65535)")]
    InvalidPort(String),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read desk profiles from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse desk profiles in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("desk {0} is configured more than once")]
    DuplicateDesk(DeskId),
    #[error("port {port} is shared by desk {first} and desk {second}")]
    DuplicatePort {
        port: Port,
        first: DeskId,
        second: DeskId,
    },
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("monitor script not found at {0}")]
    ScriptNotFound(PathBuf),
    #[error("interpreter `{interpreter}` not found")]
    InterpreterNotFound {
        interpreter: String,
        #[source]
        source: io::Error,
    },
    #[error("permission denied starting `{interpreter}`")]
    PermissionDenied {
        interpreter: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to start `{interpreter}`")]
    Spawn {
        interpreter: String,
        #[source]
        source: io::Error,
    },
    #[error("failed waiting for the monitor to exit")]
    Wait(#[source] io::Error),
}

impl LaunchError {
    /// Exit code the launcher reports when the monitor never ran to completion.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::ScriptNotFound(_) | LaunchError::InterpreterNotFound { .. } => {
                EXIT_NOT_FOUND
            }
            LaunchError::PermissionDenied { .. } => EXIT_PERMISSION_DENIED,
            LaunchError::Spawn { .. } | LaunchError::Wait(_) => EXIT_LAUNCH_FAILED,
        }
    }
}
