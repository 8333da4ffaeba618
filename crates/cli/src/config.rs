pub use desk_core::config::*;

use anyhow::Result;
use desk_core::{DeskConfig, ProgramSpec, Workspace};

use crate::cli::{Cli, LaunchArgs};

pub fn from_cli(cli: &Cli) -> Result<LauncherConfig> {
    LauncherConfig::discover(cli.root.clone())
}

/// Fully resolved inputs for one monitor launch.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub desk: DeskConfig,
    pub program: ProgramSpec,
    pub workspace: Workspace,
}

pub fn plan(config: &LauncherConfig, args: &LaunchArgs) -> Result<LaunchPlan> {
    let desk = config.desk_config(args.desk_id()?, args.port())?;
    let program = config
        .program()
        .with_overrides(args.interpreter.clone(), args.script.clone());
    let workspace = config.workspace(desk.desk);
    Ok(LaunchPlan {
        desk,
        program,
        workspace,
    })
}
