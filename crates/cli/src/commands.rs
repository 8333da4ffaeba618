use std::io::Write;

use anyhow::Result;
use chrono::Local;

use crate::banner;
use crate::cleanup::clean_workspace;
use crate::cli::{CliCommand, DeskArgs, LaunchArgs, RunArgs};
use crate::config::{self, LauncherConfig};
use crate::launch::{self, port_in_use};
use crate::pause;

const RUN_TITLE: &str = "Desk monitor launcher";

/// Run `command` and return the process exit code it calls for.
pub fn execute<W: Write>(config: &LauncherConfig, command: CliCommand, mut writer: W) -> Result<i32> {
    match command {
        CliCommand::Run(args) => handle_run(config, &args, &mut writer),
        CliCommand::Clean(args) => handle_clean(config, &args, &mut writer).map(|_| 0),
        CliCommand::Paths(args) => handle_paths(config, &args, &mut writer).map(|_| 0),
        CliCommand::Desks => handle_desks(config, &mut writer).map(|_| 0),
    }
}

fn handle_run<W: Write>(config: &LauncherConfig, args: &RunArgs, mut writer: W) -> Result<i32> {
    let plan = config::plan(config, &args.launch)?;
    let root = config.root_dir();
    let desk = &plan.desk;
    tracing::info!(desk = desk.desk.get(), port = desk.port.get(), root = %root.display(), "preparing desk");

    banner::write_header(&mut writer, RUN_TITLE, root, &plan)?;

    banner::write_step(
        &mut writer,
        1,
        2,
        &format!("Cleaning workspace for {}...", desk.display_name()),
    )?;
    let report = clean_workspace(&plan.workspace);
    banner::write_cleanup(&mut writer, &report, &plan)?;
    if port_in_use(desk.port) {
        tracing::warn!(port = desk.port.get(), "debug port already bound");
        banner::write_port_warning(&mut writer, desk.port)?;
    }

    banner::write_step(
        &mut writer,
        2,
        2,
        &format!(
            "Starting monitor for {} on port {}...",
            desk.display_name(),
            desk.port
        ),
    )?;
    banner::write_launch(
        &mut writer,
        &plan.program.command_line(root, desk),
        Local::now(),
    )?;
    writer.flush()?;

    let exit_code = match launch::launch(root, &plan.program, desk) {
        Ok(outcome) => {
            banner::write_exit(&mut writer, &plan, &outcome)?;
            outcome.exit_code
        }
        Err(err) => {
            let exit_code = err.exit_code();
            tracing::error!(desk = desk.desk.get(), error = %err, "monitor failed to start");
            let err = anyhow::Error::new(err);
            banner::write_launch_failure(&mut writer, &plan, &err, exit_code)?;
            exit_code
        }
    };

    if !args.no_pause {
        writer.flush()?;
        if let Err(err) = pause::wait_for_key(&mut writer) {
            tracing::debug!(error = %err, "pause prompt unavailable");
        }
    }

    Ok(exit_code)
}

fn handle_clean<W: Write>(config: &LauncherConfig, args: &DeskArgs, mut writer: W) -> Result<()> {
    let desk = args.desk_id()?;
    let workspace = config.workspace(desk);
    let report = clean_workspace(&workspace);

    writeln!(writer, "Cleaned {}", workspace.dir().display())?;
    writeln!(
        writer,
        "Removed {} file{}",
        report.removed_count(),
        if report.removed_count() == 1 { "" } else { "s" }
    )?;
    for dir in &report.missing_dirs {
        writeln!(writer, "Skipped missing {}", dir.display())?;
    }
    for failure in &report.failures {
        writeln!(
            writer,
            "Left in place {}: {}",
            failure.path.display(),
            failure.reason
        )?;
    }
    Ok(())
}

fn handle_paths<W: Write>(config: &LauncherConfig, args: &LaunchArgs, mut writer: W) -> Result<()> {
    let plan = config::plan(config, args)?;
    let root = config.root_dir();

    writeln!(writer, "desk:        {}", plan.desk.display_name())?;
    writeln!(writer, "port:        {}", plan.desk.port)?;
    writeln!(writer, "root:        {}", root.display())?;
    writeln!(writer, "profiles:    {}", config.profiles_path().display())?;
    writeln!(writer, "workspace:   {}", plan.workspace.dir().display())?;
    writeln!(writer, "logs:        {}", plan.workspace.monitor_logs_dir().display())?;
    writeln!(writer, "screenshots: {}", plan.workspace.screenshots_dir().display())?;
    writeln!(
        writer,
        "command:     {}",
        plan.program.command_line(root, &plan.desk)
    )?;
    Ok(())
}

fn handle_desks<W: Write>(config: &LauncherConfig, mut writer: W) -> Result<()> {
    let desks = config.profiles().sorted();
    if desks.is_empty() {
        writeln!(
            writer,
            "No desks configured in {}",
            config.profiles_path().display()
        )?;
        return Ok(());
    }

    writeln!(writer, "{:<6} {:<6} LABEL", "DESK", "PORT")?;
    for profile in desks {
        writeln!(
            writer,
            "{:<6} {:<6} {}",
            profile.desk,
            profile.port,
            profile.label.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::PROFILES_FILE_NAME;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn temp_config(profiles: Option<&str>) -> (LauncherConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        if let Some(raw) = profiles {
            fs::write(dir.path().join(PROFILES_FILE_NAME), raw).expect("write profiles");
        }
        let config = LauncherConfig::from_root_dir(dir.path().to_path_buf()).expect("config");
        (config, dir)
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(path, b"x").expect("write file");
    }

    fn launch_args(desk: u32, port: Option<u16>, script: &str) -> LaunchArgs {
        LaunchArgs {
            desk,
            port,
            interpreter: Some("sh".into()),
            script: Some(PathBuf::from(script)),
        }
    }

    fn run(config: &LauncherConfig, args: LaunchArgs) -> (Result<i32>, String) {
        let mut output = Vec::new();
        let result = execute(
            config,
            CliCommand::Run(RunArgs {
                launch: args,
                no_pause: true,
            }),
            &mut output,
        );
        (result, String::from_utf8(output).expect("utf8"))
    }

    #[cfg(unix)]
    #[test]
    fn run_cleans_then_relays_exit_code() {
        let (config, dir) = temp_config(None);
        fs::write(dir.path().join("monitor.sh"), "exit 2\n").expect("write script");
        let workspace = config.workspace(crate::model::DeskId::new(8).unwrap());
        touch(&workspace.monitor_logs_dir().join("monitor.log"));
        touch(&workspace.screenshots_dir().join("frame.png"));
        touch(&workspace.screenshots_dir().join("keep.txt"));

        let (result, output) = run(&config, launch_args(8, Some(9230), "monitor.sh"));

        assert_eq!(result.expect("run"), 2);
        assert!(output.contains("desk 8 | port 9230"));
        assert!(output.contains("[1/2] Cleaning workspace for desk 8..."));
        assert!(output.contains("removed 2 stale files (logs: 1, screenshots: 1)"));
        assert!(output.contains("[2/2] Starting monitor for desk 8 on port 9230..."));
        assert!(output.contains("--desk 8 --port 9230"));
        assert!(output.contains("exited with code 2"));
        assert!(workspace.screenshots_dir().join("keep.txt").exists());
        assert!(!workspace.monitor_logs_dir().join("monitor.log").exists());
    }

    #[cfg(unix)]
    #[test]
    fn run_uses_profile_port_and_label() {
        let (config, dir) = temp_config(Some(
            r#"{ "desks": [ { "desk": 12, "port": 9234, "label": "龙虎 12号桌" } ] }"#,
        ));
        fs::write(dir.path().join("monitor.sh"), "exit 0\n").expect("write script");

        let (result, output) = run(&config, launch_args(12, None, "monitor.sh"));

        assert_eq!(result.expect("run"), 0);
        assert!(output.contains("desk 12 (龙虎 12号桌) | port 9234"));
        assert!(output.contains("workspace already clean"));
        assert!(output.contains("--desk 12 --port 9234"));
    }

    #[test]
    fn run_without_port_fails_before_touching_workspace() {
        let (config, _dir) = temp_config(None);
        let (result, output) = run(&config, launch_args(5, None, "monitor.sh"));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("no port configured for desk 5"));
        assert!(output.is_empty());
    }

    #[test]
    fn run_reports_missing_script_with_not_found_code() {
        let (config, _dir) = temp_config(None);
        let (result, output) = run(&config, launch_args(8, Some(9230), "missing.py"));

        assert_eq!(result.expect("run"), 127);
        assert!(output.contains("Failed to start the monitor for desk 8"));
        assert!(output.contains("monitor script not found"));
        assert!(output.contains("Exiting with code 127"));
    }

    #[test]
    fn clean_reports_removed_and_missing() {
        let (config, _dir) = temp_config(None);
        let workspace = config.workspace(crate::model::DeskId::new(3).unwrap());
        touch(&workspace.screenshots_dir().join("a.json"));

        let mut output = Vec::new();
        let code = execute(
            &config,
            CliCommand::Clean(DeskArgs { desk: 3 }),
            &mut output,
        )
        .expect("clean");
        let output = String::from_utf8(output).expect("utf8");

        assert_eq!(code, 0);
        assert!(output.contains("Removed 1 file\n"));
        assert!(output.contains("Skipped missing"));
        assert!(!workspace.screenshots_dir().join("a.json").exists());
    }

    #[test]
    fn paths_touch_nothing() {
        let (config, _dir) = temp_config(None);
        let workspace = config.workspace(crate::model::DeskId::new(8).unwrap());
        touch(&workspace.screenshots_dir().join("frame.png"));

        let mut output = Vec::new();
        execute(
            &config,
            CliCommand::Paths(launch_args(8, Some(9230), "main.py")),
            &mut output,
        )
        .expect("paths");
        let output = String::from_utf8(output).expect("utf8");

        assert!(output.contains("port:        9230"));
        assert!(output.contains("desk_8"));
        assert!(output.contains("command:     sh "));
        assert!(workspace.screenshots_dir().join("frame.png").exists());
    }

    #[test]
    fn desks_lists_profiles_in_order() {
        let (config, _dir) = temp_config(Some(
            r#"{ "desks": [ { "desk": 12, "port": 9234 }, { "desk": 8, "port": 9230, "label": "east" } ] }"#,
        ));

        let mut output = Vec::new();
        execute(&config, CliCommand::Desks, &mut output).expect("desks");
        let output = String::from_utf8(output).expect("utf8");
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("8      9230   east"));
        assert!(lines[2].starts_with("12     9234"));
    }

    #[test]
    fn desks_without_profiles_says_so() {
        let (config, _dir) = temp_config(None);
        let mut output = Vec::new();
        execute(&config, CliCommand::Desks, &mut output).expect("desks");
        let output = String::from_utf8(output).expect("utf8");
        assert!(output.starts_with("No desks configured in"));
    }
}
