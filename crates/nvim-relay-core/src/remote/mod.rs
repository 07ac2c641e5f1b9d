//! Remote control of the editor server.
//!
//! The editor's own remote protocol is an external capability. This module
//! defines the three operations the coordinator consumes and an
//! implementation that drives the `nvim` binary's remote client flags.

pub mod nvim;

pub use nvim::NvimRemote;

use crate::address::ServerAddress;
use crate::error::Result;
use crate::process::LaunchedServer;
use crate::targets::{CursorPosition, FileTarget};

/// A single file-open command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub filename: String,
    pub position: Option<CursorPosition>,
}

impl From<&FileTarget> for OpenRequest {
    fn from(target: &FileTarget) -> Self {
        Self {
            filename: target.filename().to_string(),
            position: target.position(),
        }
    }
}

/// Operations an editor server exposes to other processes.
#[async_trait::async_trait]
pub trait RemoteEditor: Send + Sync {
    /// Evaluate a trivial expression at `address`.
    ///
    /// Succeeds iff the server is alive and responsive.
    async fn ping(&self, address: &ServerAddress) -> Result<()>;

    /// Open a file at `address`, moving the cursor if a position is given.
    async fn open(&self, address: &ServerAddress, request: &OpenRequest) -> Result<()>;

    /// Start a headless server listening on `address`.
    ///
    /// Returns once the process exists; it may not be listening yet.
    async fn listen(&self, address: &ServerAddress) -> Result<LaunchedServer>;
}

#[async_trait::async_trait]
impl<E: RemoteEditor + ?Sized> RemoteEditor for std::sync::Arc<E> {
    async fn ping(&self, address: &ServerAddress) -> Result<()> {
        (**self).ping(address).await
    }

    async fn open(&self, address: &ServerAddress, request: &OpenRequest) -> Result<()> {
        (**self).open(address, request).await
    }

    async fn listen(&self, address: &ServerAddress) -> Result<LaunchedServer> {
        (**self).listen(address).await
    }
}
