//! Liveness probing of the registered server.

use crate::address::ServerAddress;
use crate::registry::AddressRegistry;
use crate::remote::RemoteEditor;
use tracing::{debug, info};

/// Outcome of probing the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub alive: bool,
    /// The recorded address, only when it answered.
    pub address: Option<ServerAddress>,
}

impl ProbeResult {
    fn dead() -> Self {
        Self {
            alive: false,
            address: None,
        }
    }

    /// The live server's address, if any.
    pub fn live_address(self) -> Option<ServerAddress> {
        if self.alive {
            self.address
        } else {
            None
        }
    }
}

/// Checks whether the address in the registry still answers.
pub struct LivenessProbe<'a, E: ?Sized> {
    remote: &'a E,
}

impl<'a, E: RemoteEditor + ?Sized> LivenessProbe<'a, E> {
    pub fn new(remote: &'a E) -> Self {
        Self { remote }
    }

    /// Round-trip to `address` without touching the registry.
    pub async fn check(&self, address: &ServerAddress) -> bool {
        match self.remote.ping(address).await {
            Ok(()) => true,
            Err(e) => {
                debug!("Server {} did not answer: {}", address, e);
                false
            }
        }
    }

    /// Probe the recorded server, clearing the slot if it does not answer.
    pub async fn probe<R: AddressRegistry + ?Sized>(&self, registry: &R) -> ProbeResult {
        let Some(address) = registry.read() else {
            return ProbeResult::dead();
        };

        if self.check(&address).await {
            debug!("Server {} is alive", address);
            return ProbeResult {
                alive: true,
                address: Some(address),
            };
        }

        info!("Clearing stale server entry {}", address);
        registry.clear();
        ProbeResult::dead()
    }
}
