use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;

const PROMPT: &str = "Press any key to close...";

/// Hold the console open until the operator presses a key.
///
/// Does nothing when stdin is not a terminal, so scripted runs never block here.
pub fn wait_for_key<W: Write>(mut writer: W) -> Result<()> {
    if !io::stdin().is_terminal() {
        return Ok(());
    }

    write!(writer, "{PROMPT}")?;
    writer.flush()?;

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let result = read_key_press();
    terminal::disable_raw_mode().context("failed to disable raw mode")?;

    writeln!(writer)?;
    result.context("failed to read key press")
}

fn read_key_press() -> io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}
