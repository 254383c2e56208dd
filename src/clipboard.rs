//! Clipboard access through the platform's clipboard tool.

use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Clipboard write failure. Callers fall back to manual copying.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to write to clipboard: {0}")]
    WriteFailed(String),
}

/// Something text can be copied to.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard, reached by piping into an external tool.
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("cmd", &["/C", "clip"])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

impl Clipboard for SystemClipboard {
    /// Try each clipboard tool in turn; the first that exits cleanly wins.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut last_error = String::from("no clipboard tool available");

        for (program, args) in CANDIDATES {
            match pipe_to(program, args, text) {
                Ok(()) => {
                    debug!("Copied {} bytes with {}", text.len(), program);
                    return Ok(());
                }
                Err(e) => {
                    debug!("Clipboard tool {} failed: {}", program, e);
                    last_error = format!("{}: {}", program, e);
                }
            }
        }

        Err(ClipboardError::WriteFailed(last_error))
    }
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // stdin is dropped before waiting so the tool sees EOF, and the child is
    // reaped even when the write fails.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written?;

    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("exited with {}", status)))
    }
}
