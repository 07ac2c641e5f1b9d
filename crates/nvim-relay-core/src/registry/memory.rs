//! In-memory registry slot, for tests and for embedding the coordinator in a
//! host that keeps its own state.

use super::AddressRegistry;
use crate::address::ServerAddress;
use crate::error::RegistryError;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    slot: Mutex<Option<ServerAddress>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that already holds `address`.
    pub fn with_address(address: ServerAddress) -> Self {
        Self {
            slot: Mutex::new(Some(address)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ServerAddress>> {
        // A poisoned slot still holds a valid Option.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AddressRegistry for MemoryRegistry {
    fn read(&self) -> Option<ServerAddress> {
        self.lock().clone()
    }

    fn write(&self, address: &ServerAddress) -> Result<(), RegistryError> {
        let mut slot = self.lock();
        if slot.is_some() {
            return Err(RegistryError::Occupied {
                path: PathBuf::from("<memory>"),
            });
        }
        *slot = Some(address.clone());
        Ok(())
    }

    fn clear(&self) {
        self.lock().take();
    }
}
