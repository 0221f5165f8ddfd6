use crate::types::{AggregatorError, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Host-platform I/O the aggregation core stays independent of: clipboard,
/// notifications, and the platform credential store.
pub trait HostIo: Send + Sync {
    fn read_clipboard(&self) -> Result<String>;
    fn write_clipboard(&self, text: &str) -> Result<()>;
    fn notify(&self, title: &str, body: &str) -> Result<()>;
    /// Look the named credential up in the platform secret store.
    fn credential(&self, name: &str) -> Option<String>;
}

const KEYRING_SERVICE: &str = "search-aggregator";

#[cfg(target_os = "macos")]
const PASTE_COMMANDS: &[&[&str]] = &[&["pbpaste"]];
#[cfg(target_os = "macos")]
const COPY_COMMANDS: &[&[&str]] = &[&["pbcopy"]];

#[cfg(not(target_os = "macos"))]
const PASTE_COMMANDS: &[&[&str]] = &[
    &["wl-paste", "--no-newline"],
    &["xclip", "-selection", "clipboard", "-o"],
];
#[cfg(not(target_os = "macos"))]
const COPY_COMMANDS: &[&[&str]] = &[&["wl-copy"], &["xclip", "-selection", "clipboard"]];

/// Desktop implementation: platform clipboard tools, desktop notifications
/// via notify-rust, credentials via the OS keyring.
pub struct DesktopHost;

impl DesktopHost {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DesktopHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostIo for DesktopHost {
    fn read_clipboard(&self) -> Result<String> {
        for command in PASTE_COMMANDS {
            match Command::new(command[0]).args(&command[1..]).output() {
                Ok(output) if output.status.success() => {
                    return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
                }
                Ok(output) => {
                    debug!("{} exited with {}", command[0], output.status);
                }
                Err(e) => {
                    debug!("{} unavailable: {}", command[0], e);
                }
            }
        }
        Err(AggregatorError::General(
            "No clipboard tool available (tried pbpaste/wl-paste/xclip)".to_string(),
        ))
    }

    fn write_clipboard(&self, text: &str) -> Result<()> {
        for command in COPY_COMMANDS {
            let spawned = Command::new(command[0])
                .args(&command[1..])
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            let mut child = match spawned {
                Ok(child) => child,
                Err(e) => {
                    debug!("{} unavailable: {}", command[0], e);
                    continue;
                }
            };

            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }

            let status = child.wait()?;
            if status.success() {
                return Ok(());
            }
            warn!("{} exited with {}", command[0], status);
        }
        Err(AggregatorError::General(
            "No clipboard tool available (tried pbcopy/wl-copy/xclip)".to_string(),
        ))
    }

    fn notify(&self, title: &str, body: &str) -> Result<()> {
        notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .show()
            .map_err(|e| AggregatorError::General(format!("Notification failed: {}", e)))?;
        Ok(())
    }

    fn credential(&self, name: &str) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, name).ok()?;
        entry.get_password().ok()
    }
}
