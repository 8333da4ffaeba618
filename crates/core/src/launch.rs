use std::ffi::OsString;
use std::io;
use std::net::{Ipv4Addr, TcpListener};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::error::{LaunchError, EXIT_LAUNCH_FAILED};
use crate::model::{DeskConfig, Port};
use crate::profiles::ProgramSection;

pub const DEFAULT_INTERPRETER: &str = "python";
pub const DEFAULT_SCRIPT: &str = "main.py";

/// The external monitor: `<interpreter> <script> [args...] --desk <id> --port <port>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSpec {
    pub interpreter: String,
    pub script: PathBuf,
    pub extra_args: Vec<String>,
}

impl Default for ProgramSpec {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            script: PathBuf::from(DEFAULT_SCRIPT),
            extra_args: Vec::new(),
        }
    }
}

impl ProgramSpec {
    pub fn from_section(section: &ProgramSection) -> Self {
        let defaults = Self::default();
        Self {
            interpreter: section.interpreter.clone().unwrap_or(defaults.interpreter),
            script: section.script.clone().unwrap_or(defaults.script),
            extra_args: section.args.clone(),
        }
    }

    pub fn with_overrides(mut self, interpreter: Option<String>, script: Option<PathBuf>) -> Self {
        if let Some(interpreter) = interpreter {
            self.interpreter = interpreter;
        }
        if let Some(script) = script {
            self.script = script;
        }
        self
    }

    /// Relative scripts resolve against the launcher root, not the caller's directory.
    pub fn script_path(&self, root: &Path) -> PathBuf {
        if self.script.is_absolute() {
            self.script.clone()
        } else {
            root.join(&self.script)
        }
    }

    pub fn arguments(&self, root: &Path, desk: &DeskConfig) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(self.extra_args.len() + 5);
        args.push(self.script_path(root).into_os_string());
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push("--desk".into());
        args.push(desk.desk.to_string().into());
        args.push("--port".into());
        args.push(desk.port.to_string().into());
        args
    }

    /// Printable form of the command, for banners.
    pub fn command_line(&self, root: &Path, desk: &DeskConfig) -> String {
        let mut parts = vec![self.interpreter.clone()];
        parts.extend(
            self.arguments(root, desk)
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    pub fn command(&self, root: &Path, desk: &DeskConfig) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.args(self.arguments(root, desk))
            .current_dir(root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

#[derive(Debug, Clone)]
pub struct LaunchOutcome {
    pub exit_code: i32,
    pub elapsed: Duration,
}

/// Start the monitor for `desk` and block until it exits.
pub fn launch(
    root: &Path,
    program: &ProgramSpec,
    desk: &DeskConfig,
) -> Result<LaunchOutcome, LaunchError> {
    let script = program.script_path(root);
    if !script.is_file() {
        return Err(LaunchError::ScriptNotFound(script));
    }

    let clock = Instant::now();
    let mut child = program
        .command(root, desk)
        .spawn()
        .map_err(|source| spawn_error(&program.interpreter, source))?;
    tracing::info!(
        desk = desk.desk.get(),
        port = desk.port.get(),
        pid = child.id(),
        "monitor started"
    );

    let status = child.wait().map_err(LaunchError::Wait)?;
    let exit_code = exit_code_of(status);
    tracing::info!(desk = desk.desk.get(), exit_code, "monitor exited");

    Ok(LaunchOutcome {
        exit_code,
        elapsed: clock.elapsed(),
    })
}

fn spawn_error(interpreter: &str, source: io::Error) -> LaunchError {
    let interpreter = interpreter.to_string();
    match source.kind() {
        io::ErrorKind::NotFound => LaunchError::InterpreterNotFound {
            interpreter,
            source,
        },
        io::ErrorKind::PermissionDenied => LaunchError::PermissionDenied {
            interpreter,
            source,
        },
        _ => LaunchError::Spawn {
            interpreter,
            source,
        },
    }
}

/// Map a child status onto the code the launcher exits with.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    EXIT_LAUNCH_FAILED
}

/// Whether something already listens on `port` on the loopback interface.
///
/// Only `AddrInUse` counts; other bind failures (privileged ports, missing
/// loopback) say nothing about a running monitor.
pub fn port_in_use(port: Port) -> bool {
    match TcpListener::bind((Ipv4Addr::LOCALHOST, port.get())) {
        Ok(_) => false,
        Err(err) => is_addr_in_use(&err),
    }
}

fn is_addr_in_use(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::AddrInUse
}
