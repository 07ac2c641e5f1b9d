//! File-backed registry slot.

use super::AddressRegistry;
use crate::address::ServerAddress;
use crate::error::RegistryError;
use crate::platform;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Registry slot stored as a plain-text file holding only the address.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    /// Open the registry at the default platform location.
    pub fn open() -> Self {
        Self::open_at(platform::registry_file_path())
    }

    /// Open the registry at a specific path.
    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: std::io::Error) -> RegistryError {
        RegistryError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl AddressRegistry for FileRegistry {
    fn read(&self) -> Option<ServerAddress> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => ServerAddress::parse(&contents),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!("Failed to read server file {}: {}", self.path.display(), e);
                }
                None
            }
        }
    }

    fn write(&self, address: &ServerAddress) -> Result<(), RegistryError> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                RegistryError::Occupied {
                    path: self.path.clone(),
                }
            } else {
                self.write_error(e)
            }
        })?;

        // The slot now exists even if the write below fails; the caller owns
        // cleanup in that case.
        file.write_all(address.as_str().as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                warn!("Server file {} created but not written: {}", self.path.display(), e);
                self.write_error(e)
            })?;

        debug!("Recorded server {} in {}", address, self.path.display());
        Ok(())
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed server file {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => debug!("Failed to remove server file {}: {}", self.path.display(), e),
        }
    }
}
