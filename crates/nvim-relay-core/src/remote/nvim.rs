//! Neovim remote client driven through the `nvim` binary.
//!
//! Each remote call runs `nvim --server <address> ...` as a short-lived
//! child process with a bounded timeout; the child is killed if the timeout
//! elapses.

use super::{OpenRequest, RemoteEditor};
use crate::address::ServerAddress;
use crate::config::{RelayConfig, Timings};
use crate::error::{RelayError, Result};
use crate::process::{LaunchConfig, LaunchedServer, ServerLauncher};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// [`RemoteEditor`] backed by Neovim's `--server`/`--remote*` flags.
#[derive(Debug, Clone)]
pub struct NvimRemote {
    editor: PathBuf,
    timings: Timings,
    server_log: Option<PathBuf>,
}

impl NvimRemote {
    /// Drive the editor found at `editor` (a path or a name on `PATH`).
    pub fn new(editor: impl AsRef<Path>) -> Self {
        Self {
            editor: editor.as_ref().to_path_buf(),
            timings: Timings::default(),
            server_log: None,
        }
    }

    /// Set probe and dispatch timeouts.
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Capture the launched server's output in `path`.
    pub fn with_server_log(mut self, path: impl AsRef<Path>) -> Self {
        self.server_log = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn editor(&self) -> &Path {
        &self.editor
    }

    /// Arguments of the liveness round-trip.
    pub fn ping_args(address: &ServerAddress) -> Vec<String> {
        vec![
            "--server".to_string(),
            address.to_string(),
            "--remote-expr".to_string(),
            "1".to_string(),
        ]
    }

    /// Arguments of a file-open command.
    pub fn open_args(address: &ServerAddress, request: &OpenRequest) -> Vec<String> {
        let mut args = vec![
            "--server".to_string(),
            address.to_string(),
            "--remote".to_string(),
        ];
        if let Some(pos) = request.position {
            args.push(format!("+call cursor({}, {})", pos.line, pos.column));
        }
        args.push(request.filename.clone());
        args
    }

    async fn run(&self, address: &ServerAddress, args: Vec<String>, limit: Duration) -> Result<()> {
        debug!("{} {}", self.editor.display(), args.join(" "));

        let mut cmd = Command::new(&self.editor);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| RelayError::Timeout {
                address: address.to_string(),
                after: limit,
            })?
            .map_err(|e| RelayError::Remote {
                address: address.to_string(),
                message: format!("failed to run {}: {}", self.editor.display(), e),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(RelayError::Remote {
                address: address.to_string(),
                message: format!("{} ({})", stderr.trim(), output.status),
            })
        }
    }
}

impl Default for NvimRemote {
    fn default() -> Self {
        Self::new(RelayConfig::DEFAULT_EDITOR)
    }
}

#[async_trait::async_trait]
impl RemoteEditor for NvimRemote {
    async fn ping(&self, address: &ServerAddress) -> Result<()> {
        self.run(address, Self::ping_args(address), self.timings.probe_timeout)
            .await
    }

    async fn open(&self, address: &ServerAddress, request: &OpenRequest) -> Result<()> {
        self.run(
            address,
            Self::open_args(address, request),
            self.timings.dispatch_timeout,
        )
        .await
    }

    async fn listen(&self, address: &ServerAddress) -> Result<LaunchedServer> {
        let mut config = LaunchConfig::new(&self.editor, address.clone());
        if let Some(ref log) = self.server_log {
            config = config.with_log_file(log);
        }
        ServerLauncher::launch(&config)
    }
}
