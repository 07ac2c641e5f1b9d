//! Headless server launching.

use crate::address::ServerAddress;
use crate::error::{RelayError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};
use tracing::{debug, error, info, warn};

/// Configuration for launching a headless editor server.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Editor executable (name on `PATH` or full path).
    pub editor: PathBuf,
    /// Address the server listens on.
    pub address: ServerAddress,
    /// Additional arguments to pass after the listen flags.
    pub extra_args: Vec<String>,
    /// Path to write the server's stdout/stderr.
    pub log_file: Option<PathBuf>,
}

impl LaunchConfig {
    /// Create a launch config for `editor` listening on `address`.
    pub fn new(editor: impl AsRef<Path>, address: ServerAddress) -> Self {
        Self {
            editor: editor.as_ref().to_path_buf(),
            address,
            extra_args: vec![],
            log_file: None,
        }
    }

    /// Add an extra argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Set the log file path.
    pub fn with_log_file(mut self, path: impl AsRef<Path>) -> Self {
        self.log_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Full argument list passed to the editor.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--listen".to_string(),
            self.address.as_str().to_string(),
            "--headless".to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    fn editor_name(&self) -> String {
        self.editor.display().to_string()
    }
}

/// A server process started by this invocation.
#[derive(Debug)]
pub struct LaunchedServer {
    pid: Option<u32>,
    child: Option<Child>,
}

impl LaunchedServer {
    /// A server whose process is not owned by this invocation.
    pub fn detached(pid: Option<u32>) -> Self {
        Self { pid, child: None }
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Reap the process if it has exited.
    ///
    /// Returns `None` while it is still running or when the process is not
    /// owned by this invocation.
    pub fn try_exit_status(&mut self) -> Option<ExitStatus> {
        let child = self.child.as_mut()?;
        match child.try_wait() {
            Ok(status) => status,
            Err(e) => {
                debug!("Failed to poll server process: {}", e);
                None
            }
        }
    }
}

/// Starts headless editor servers.
pub struct ServerLauncher;

impl ServerLauncher {
    /// Spawn the server and return without waiting for it to listen.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(config: &LaunchConfig) -> Result<LaunchedServer> {
        let mut cmd = Command::new(&config.editor);
        cmd.args(config.args());
        cmd.stdin(Stdio::null());
        // The server outlives this invocation's interest in it.
        cmd.kill_on_drop(false);

        match config.log_file {
            Some(ref log_file) => {
                if let Some(parent) = log_file.parent() {
                    fs::create_dir_all(parent).ok();
                }
                let file = fs::File::create(log_file).map_err(|e| RelayError::Io {
                    message: "create server log file".to_string(),
                    path: Some(log_file.clone()),
                    source: Some(e),
                })?;
                let stdout_file = file.try_clone().map_err(|e| RelayError::Io {
                    message: "clone server log file handle".to_string(),
                    path: Some(log_file.clone()),
                    source: Some(e),
                })?;
                cmd.stdout(Stdio::from(stdout_file));
                cmd.stderr(Stdio::from(file));
            }
            None => {
                cmd.stdout(Stdio::null());
                cmd.stderr(Stdio::null());
            }
        }

        // Own process group, so Ctrl+C in the console that started us does
        // not take the server down with it.
        #[cfg(unix)]
        {
            cmd.process_group(0);
        }

        #[cfg(windows)]
        {
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x00000200;
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            cmd.creation_flags(CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW);
        }

        info!(
            "Launching {} listening on {}",
            config.editor.display(),
            config.address
        );

        let child = cmd.spawn().map_err(|e| {
            error!("Failed to spawn {}: {}", config.editor.display(), e);
            RelayError::Launch {
                editor: config.editor_name(),
                message: e.to_string(),
                source: Some(e),
            }
        })?;

        let pid = child.id();
        match pid {
            Some(pid) => info!("Launched server with PID {}", pid),
            None => warn!("Launched server exited before its PID could be read"),
        }

        Ok(LaunchedServer {
            pid,
            child: Some(child),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn addr() -> ServerAddress {
        ServerAddress::parse("/tmp/nvim-unity-test.sock").unwrap()
    }

    #[test]
    fn test_launch_config_args() {
        let config = LaunchConfig::new("nvim", addr()).with_arg("--clean");

        assert_eq!(
            config.args(),
            vec!["--listen", "/tmp/nvim-unity-test.sock", "--headless", "--clean"]
        );
    }

    #[test]
    fn test_launch_config_builder() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("server.log");

        let config = LaunchConfig::new("/usr/bin/nvim", addr()).with_log_file(&log_file);

        assert_eq!(config.editor, PathBuf::from("/usr/bin/nvim"));
        assert_eq!(config.log_file, Some(log_file));
    }

    #[tokio::test]
    async fn test_launch_missing_editor() {
        let temp_dir = TempDir::new().unwrap();
        let config = LaunchConfig::new(temp_dir.path().join("no-such-editor"), addr());

        let err = ServerLauncher::launch(&config).unwrap_err();
        match err {
            RelayError::Launch { editor, .. } => assert!(editor.contains("no-such-editor")),
            other => panic!("Expected Launch error, got: {:?}", other),
        }
    }

    #[test]
    fn test_detached_server_has_no_exit_status() {
        let mut server = LaunchedServer::detached(Some(42));
        assert_eq!(server.pid(), Some(42));
        assert!(server.try_exit_status().is_none());
    }
}
