use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

/// How a rendered label leaves the server. Only `Download` is portable; the
/// other two hand the file to collaborators on the host OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Stream the file back to the client as an attachment.
    Download,
    /// Hand the file to the OS's registered document handler.
    #[default]
    OpenWithDefaultHandler,
    /// Submit the file to the print spooler.
    SubmitToPrintSpool,
}

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: &'static str,
        source: std::io::Error,
    },
    #[error("{command} exited with {status}")]
    CommandFailed {
        command: &'static str,
        status: std::process::ExitStatus,
    },
    #[error("download mode has no dispatch command")]
    NotDispatchable,
}

/// Hands `path` to the host OS according to `mode`.
pub async fn dispatch(mode: DeliveryMode, path: &Path) -> Result<(), DeliveryError> {
    let (name, mut command) = match mode {
        DeliveryMode::Download => return Err(DeliveryError::NotDispatchable),
        DeliveryMode::OpenWithDefaultHandler => open_command(path),
        DeliveryMode::SubmitToPrintSpool => spool_command(path),
    };

    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|source| DeliveryError::Spawn { command: name, source })?;

    if !status.success() {
        return Err(DeliveryError::CommandFailed { command: name, status });
    }

    Ok(())
}

#[cfg(target_os = "windows")]
fn open_command(path: &Path) -> (&'static str, Command) {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    ("cmd", command)
}

#[cfg(target_os = "macos")]
fn open_command(path: &Path) -> (&'static str, Command) {
    let mut command = Command::new("open");
    command.arg(path);
    ("open", command)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_command(path: &Path) -> (&'static str, Command) {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    ("xdg-open", command)
}

#[cfg(target_os = "windows")]
fn spool_command(path: &Path) -> (&'static str, Command) {
    let mut command = Command::new("powershell");
    command.args(["-NoProfile", "-Command", "Start-Process", "-Verb", "Print"]).arg(path);
    ("powershell", command)
}

#[cfg(unix)]
fn spool_command(path: &Path) -> (&'static str, Command) {
    let mut command = Command::new("lp");
    command.arg(path);
    ("lp", command)
}
