//! Process management for the shared editor server.
//!
//! Only launching lives here. Whether a launched server is still alive is
//! decided by a remote round-trip (see [`crate::probe`]), not by the process
//! table, since the address is what clients actually depend on.

mod launcher;

pub use launcher::{LaunchConfig, LaunchedServer, ServerLauncher};
