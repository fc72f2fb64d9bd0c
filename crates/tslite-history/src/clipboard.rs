//! Clipboard - write-text capability
//!
//! [`SystemClipboard`] pipes text into the platform clipboard tool
//! (`pbcopy` on macOS, `clip` on Windows, `wl-copy` or `xclip` elsewhere).

use crate::error::ClipboardError;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Result of a copy request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text is on the clipboard
    Copied,
    /// Clipboard unavailable or write refused
    Failed(String),
}

impl CopyOutcome {
    /// Whether the copy succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, CopyOutcome::Copied)
    }
}

/// Write-text clipboard capability
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard backed by an external command reading stdin
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    program: String,
    args: Vec<String>,
}

impl SystemClipboard {
    /// Clipboard tool for the current platform
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::with_command("pbcopy", &[])
        } else if cfg!(target_os = "windows") {
            Self::with_command("clip", &[])
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::with_command("wl-copy", &[])
        } else {
            Self::with_command("xclip", &["-selection", "clipboard"])
        }
    }

    /// Clipboard backed by an arbitrary command
    #[must_use]
    pub fn with_command(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Program that receives the text
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::detect()
    }
}

#[async_trait::async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::Unavailable(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
            // Dropping stdin closes the pipe so the tool can finish
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;

        if status.success() {
            debug!(program = %self.program, bytes = text.len(), "Copied to clipboard");
            Ok(())
        } else {
            Err(ClipboardError::WriteFailed(format!(
                "{} exited with {}",
                self.program, status
            )))
        }
    }
}
