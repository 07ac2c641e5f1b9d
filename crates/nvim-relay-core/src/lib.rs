//! nvim-relay core - share one headless Neovim between IDE "open file" calls.
//!
//! An IDE configured with an external editor starts a new process for every
//! file it opens. This crate lets each of those short-lived processes find
//! the one long-running Neovim server, or become the process that starts it.
//!
//! # Protocol
//!
//! 1. Arguments are parsed into [`FileTarget`]s by [`TargetParser`].
//! 2. The [`AddressRegistry`] slot is read and its address probed; a dead
//!    address is cleared on the spot.
//! 3. A live server receives the targets. Otherwise a fresh address is
//!    claimed with an exclusive write, a headless server is launched on it,
//!    and the targets follow once it has had time to start.
//! 4. The launching process stays around until the server stops answering,
//!    then releases the slot.
//!
//! # Example
//!
//! ```rust,no_run
//! use nvim_relay_core::{Coordinator, FileRegistry, NvimRemote, Route, TargetParser};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> nvim_relay_core::Result<()> {
//!     let targets = TargetParser::parse(["--line", "12", "src/main.rs"])?;
//!     let coordinator = Coordinator::new(FileRegistry::open(), NvimRemote::default());
//!
//!     if let Route::Launched { address, mut server, .. } = coordinator.open(&targets).await? {
//!         coordinator.wait_for_exit(&address, &mut server).await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod address;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod platform;
pub mod probe;
pub mod process;
pub mod registry;
pub mod remote;
pub mod targets;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use address::ServerAddress;
pub use config::{RelayConfig, TimingConfig, Timings};
pub use coordinator::{Coordinator, Route};
pub use dispatch::{DispatchReport, Dispatcher};
pub use error::{RegistryError, RelayError, Result};
pub use probe::{LivenessProbe, ProbeResult};
pub use process::{LaunchConfig, LaunchedServer, ServerLauncher};
pub use registry::{AddressRegistry, FileRegistry, MemoryRegistry};
pub use remote::{NvimRemote, OpenRequest, RemoteEditor};
pub use targets::{CursorPosition, FileTarget, PendingPosition, TargetParser};
