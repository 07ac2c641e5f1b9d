//! The registry slot recording the live server's address.
//!
//! Exactly one slot exists system-wide. Its presence means "a server is
//! believed to be live"; exclusive creation is the only mutual exclusion
//! between concurrent invocations racing to become the launcher.
//!
//! # Location
//!
//! The file-backed slot lives in the system temporary directory:
//! - **Linux/macOS**: `/tmp/nvim-unity-server.txt`
//! - **Windows**: `%TEMP%\nvim-unity-server.txt`

pub mod file_registry;
pub mod memory;

pub use file_registry::FileRegistry;
pub use memory::MemoryRegistry;

use crate::address::ServerAddress;
use crate::error::RegistryError;

/// A named single-writer slot holding one server address.
pub trait AddressRegistry: Send + Sync {
    /// Read the recorded address, if any.
    ///
    /// An absent slot and an empty or whitespace-only one both read as `None`.
    fn read(&self) -> Option<ServerAddress>;

    /// Create the slot and record `address`.
    ///
    /// Fails with [`RegistryError::Occupied`] rather than overwriting an
    /// existing slot.
    fn write(&self, address: &ServerAddress) -> Result<(), RegistryError>;

    /// Remove the slot. Idempotent; failures are ignored.
    fn clear(&self);
}

impl<R: AddressRegistry + ?Sized> AddressRegistry for std::sync::Arc<R> {
    fn read(&self) -> Option<ServerAddress> {
        (**self).read()
    }

    fn write(&self, address: &ServerAddress) -> Result<(), RegistryError> {
        (**self).write(address)
    }

    fn clear(&self) {
        (**self).clear()
    }
}
