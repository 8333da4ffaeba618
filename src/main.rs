use std::io::Write;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = desk_launcher::cli::Cli::parse();
    desk_launcher::logging::init_tracing(cli.log_filter.clone())?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let outcome = desk_launcher::config::from_cli(&cli).and_then(|config| {
        desk_launcher::commands::execute(&config, cli.command.clone(), &mut handle)
    });

    let code = match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if cli.command.wants_pause() {
                let _ = desk_launcher::pause::wait_for_key(&mut handle);
            }
            1
        }
    };

    handle.flush()?;
    drop(handle);
    std::process::exit(code)
}
