//! Process-launch boundary
//!
//! The panic gesture asks the host platform to bring the assistant to the
//! foreground. What that means is platform-specific, so it is delegated to a
//! configured command; the daemon only cares whether the request succeeded.

use async_trait::async_trait;

use crate::{Error, Result};

/// Brings the host process/application to the foreground
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Request foreground focus
    ///
    /// # Errors
    ///
    /// Returns error if the platform rejects or fails the request. Callers
    /// treat failure as non-fatal.
    async fn bring_to_foreground(&self) -> Result<()>;
}

/// Launcher that runs a configured shell command
pub struct CommandLauncher {
    command: String,
}

impl CommandLauncher {
    /// Create a launcher for the given shell command
    #[must_use]
    pub const fn new(command: String) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Launcher for CommandLauncher {
    async fn bring_to_foreground(&self) -> Result<()> {
        tracing::debug!(command = %self.command, "running launch command");

        let status = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .status()
            .await
            .map_err(|e| Error::Launch(format!("failed to spawn launch command: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Launch(format!(
                "launch command exited with {status}"
            )))
        }
    }
}
