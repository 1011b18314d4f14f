//! OS integration: open a file with its default application, or show it in
//! the platform file browser.
//!
//! Both operations spawn the platform opener and return without waiting.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Opening files is not supported on this platform")]
    Unsupported,
}

/// Opens `path` with the OS default handler.
pub fn open_path(path: &Path) -> Result<(), HostError> {
    ensure_exists(path)?;
    let cmd = open_command(path).ok_or(HostError::Unsupported)?;
    spawn(cmd)?;
    tracing::info!(path = %path.display(), "Opened with default application");
    Ok(())
}

/// Shows `path` in the OS file browser. Where the platform can select the
/// file itself it does; otherwise the containing folder is opened.
pub fn reveal_path(path: &Path) -> Result<(), HostError> {
    ensure_exists(path)?;
    let cmd = reveal_command(path).ok_or(HostError::Unsupported)?;
    spawn(cmd)?;
    tracing::info!(path = %path.display(), "Revealed in file browser");
    Ok(())
}

fn ensure_exists(path: &Path) -> Result<(), HostError> {
    if path.exists() {
        Ok(())
    } else {
        Err(HostError::NotFound(path.to_path_buf()))
    }
}

fn spawn(mut cmd: Command) -> Result<(), HostError> {
    cmd.spawn().map(drop).map_err(|source| HostError::Spawn {
        program: cmd.get_program().to_string_lossy().into_owned(),
        source,
    })
}

#[cfg(target_os = "windows")]
fn open_command(path: &Path) -> Option<Command> {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    Some(cmd)
}

#[cfg(target_os = "macos")]
fn open_command(path: &Path) -> Option<Command> {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    Some(cmd)
}

#[cfg(target_os = "linux")]
fn open_command(path: &Path) -> Option<Command> {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    Some(cmd)
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn open_command(_path: &Path) -> Option<Command> {
    None
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Option<Command> {
    let mut cmd = Command::new("explorer");
    cmd.arg(format!("/select,{}", path.display()));
    Some(cmd)
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Option<Command> {
    let mut cmd = Command::new("open");
    cmd.arg("-R").arg(path);
    Some(cmd)
}

#[cfg(target_os = "linux")]
fn reveal_command(path: &Path) -> Option<Command> {
    // xdg-open has no "select" mode; open the folder instead
    let folder = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    };
    let mut cmd = Command::new("xdg-open");
    cmd.arg(folder);
    Some(cmd)
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn reveal_command(_path: &Path) -> Option<Command> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_path_is_not_found() {
        let err = open_path(Path::new("/definitely/not/here.html")).unwrap_err();
        assert!(matches!(err, HostError::NotFound(_)));
    }

    #[test]
    fn reveal_missing_path_is_not_found() {
        let err = reveal_path(Path::new("/definitely/not/here.html")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_open_uses_xdg_open() {
        let cmd = open_command(Path::new("/tmp/receta.html")).unwrap();
        assert_eq!(cmd.get_program(), "xdg-open");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec![std::ffi::OsStr::new("/tmp/receta.html")]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_reveal_opens_parent_folder() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("receta.html");
        std::fs::write(&file, "x").unwrap();

        let cmd = reveal_command(&file).unwrap();
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec![dir.path().as_os_str()]);

        let cmd = reveal_command(dir.path()).unwrap();
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec![dir.path().as_os_str()]);
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn macos_reveal_selects_file() {
        let cmd = reveal_command(Path::new("/tmp/receta.html")).unwrap();
        assert_eq!(cmd.get_program(), "open");
        assert_eq!(cmd.get_args().next().unwrap(), "-R");
    }
}
