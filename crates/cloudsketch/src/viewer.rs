//! Opening rendered files in the platform viewer.

use std::{
    io,
    path::Path,
    process::{Command, Stdio},
};

use log::debug;

fn opener(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Opens `path` with the default application and returns without waiting.
pub fn open(path: &Path) -> io::Result<()> {
    let mut command = opener(path);
    debug!(command:? = command; "Opening rendered diagram");
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
