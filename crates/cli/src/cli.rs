use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{value_parser, Args, Parser, Subcommand};

use crate::model::{DeskId, Port};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "desk-launcher",
    version,
    about = "Reset a desk's workspace and run its monitor until it exits.",
    after_help = "Examples:\n  desk-launcher run --desk 8 --port 9230\n  desk-launcher run --desk 12            (port taken from desks.json)\n  desk-launcher clean --desk 8\n  desk-launcher paths --desk 8 --port 9230\n  desk-launcher desks"
)]
pub struct Cli {
    /// Launcher root holding the monitor script, desks.json and temp/ (defaults to the executable's directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub root: Option<PathBuf>,

    /// Override the tracing filter for launcher diagnostics (e.g. "warn", "debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Clean the desk workspace, start the monitor and wait for it to exit
    Run(RunArgs),
    /// Only clean the desk workspace
    Clean(DeskArgs),
    /// Show the resolved paths and monitor command line without touching anything
    Paths(LaunchArgs),
    /// List the desks configured in desks.json
    Desks,
}

impl CliCommand {
    /// Whether the console should wait for a key press before closing.
    pub fn wants_pause(&self) -> bool {
        matches!(self, CliCommand::Run(args) if !args.no_pause)
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeskArgs {
    /// Desk (table) number
    #[arg(long, value_name = "ID", value_parser = value_parser!(u32).range(1..))]
    pub desk: u32,
}

impl DeskArgs {
    pub fn desk_id(&self) -> Result<DeskId> {
        desk_id(self.desk)
    }
}

#[derive(Args, Debug, Clone)]
pub struct LaunchArgs {
    /// Desk (table) number
    #[arg(long, value_name = "ID", value_parser = value_parser!(u32).range(1..))]
    pub desk: u32,

    /// Debug port handed to the monitor (defaults to the desk's entry in desks.json)
    #[arg(long, value_name = "PORT", value_parser = value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Interpreter used to run the monitor script
    #[arg(long = "python", value_name = "PROGRAM")]
    pub interpreter: Option<String>,

    /// Monitor script, relative to the launcher root unless absolute
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,
}

impl LaunchArgs {
    pub fn desk_id(&self) -> Result<DeskId> {
        desk_id(self.desk)
    }

    pub fn port(&self) -> Option<Port> {
        self.port.and_then(Port::new)
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Exit as soon as the monitor does instead of waiting for a key press
    #[arg(long)]
    pub no_pause: bool,
}

fn desk_id(value: u32) -> Result<DeskId> {
    DeskId::new(value).ok_or_else(|| anyhow!("desk id must be positive"))
}
