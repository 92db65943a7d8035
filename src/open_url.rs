use anyhow::{Context, Result};
use std::process::Command;

/// Open `url` with the configured command, or the system default.
pub fn open_url(url: &str, command: Option<&str>) -> Result<()> {
    if let Some((program, args)) = command.and_then(split_command) {
        Command::new(program)
            .args(args)
            .arg(url)
            .spawn()
            .with_context(|| format!("failed to run {} for {}", program, url))?;
        return Ok(());
    }
    if open::that(url).is_ok() {
        return Ok(());
    }
    tracing::debug!(url, "system opener failed, trying firefox");
    Command::new("firefox")
        .arg(url)
        .spawn()
        .with_context(|| format!("could not open {}", url))?;
    Ok(())
}

fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}
