//! Routing an invocation to the shared server.
//!
//! # States
//!
//! ```text
//! ROUTE_DECISION ──alive──> ATTACH_EXISTING ─────────────────────> done
//!        │
//!        └──dead/none──> LAUNCH_NEW ──> (caller) WAIT_LOOP ──> TERMINATED
//!                            │
//!                            └──slot taken──> JOIN_WINNER ──────> done
//! ```
//!
//! Parsing happens before the coordinator is involved; an empty target list
//! is rejected here before anything is contacted.

use crate::address::ServerAddress;
use crate::config::Timings;
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::error::{RegistryError, RelayError, Result};
use crate::probe::LivenessProbe;
use crate::process::LaunchedServer;
use crate::registry::AddressRegistry;
use crate::remote::RemoteEditor;
use crate::targets::FileTarget;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Where an invocation's targets ended up.
#[derive(Debug)]
pub enum Route {
    /// A live server was already registered.
    Attached {
        address: ServerAddress,
        report: DispatchReport,
    },
    /// This invocation started the server and owns its lifetime.
    Launched {
        address: ServerAddress,
        server: LaunchedServer,
        report: DispatchReport,
    },
    /// Another invocation claimed the slot first; targets went to its server.
    Joined {
        address: ServerAddress,
        report: DispatchReport,
    },
}

impl Route {
    pub fn address(&self) -> &ServerAddress {
        match self {
            Route::Attached { address, .. }
            | Route::Launched { address, .. }
            | Route::Joined { address, .. } => address,
        }
    }

    pub fn report(&self) -> DispatchReport {
        match self {
            Route::Attached { report, .. }
            | Route::Launched { report, .. }
            | Route::Joined { report, .. } => *report,
        }
    }
}

/// Decides which server receives an invocation's targets.
pub struct Coordinator<R, E> {
    registry: R,
    remote: E,
    timings: Timings,
}

impl<R: AddressRegistry, E: RemoteEditor> Coordinator<R, E> {
    pub fn new(registry: R, remote: E) -> Self {
        Self {
            registry,
            remote,
            timings: Timings::default(),
        }
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn remote(&self) -> &E {
        &self.remote
    }

    /// Send `targets` to the live server, launching one if needed.
    pub async fn open(&self, targets: &[FileTarget]) -> Result<Route> {
        if targets.is_empty() {
            return Err(RelayError::NoTargets);
        }

        let probe = LivenessProbe::new(&self.remote);
        if let Some(address) = probe.probe(&self.registry).await.live_address() {
            info!("Attaching to server {}", address);
            let report = self.dispatch(&address, targets).await;
            return Ok(Route::Attached { address, report });
        }

        let address = ServerAddress::generate();
        match self.claim(&address) {
            Ok(()) => self.launch(address, targets).await,
            Err(RegistryError::Occupied { path }) => match self.read_winner().await {
                Some(winner) => self.join_winner(winner, targets).await,
                None => {
                    // The holder created the slot and never filled it.
                    warn!("Registry {} stayed empty; claiming it again", path.display());
                    self.registry.clear();
                    self.claim(&address)?;
                    self.launch(address, targets).await
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Record `address` in the slot, removing a half-written slot on failure.
    fn claim(&self, address: &ServerAddress) -> std::result::Result<(), RegistryError> {
        match self.registry.write(address) {
            Err(e @ RegistryError::Write { .. }) => {
                self.registry.clear();
                Err(e)
            }
            other => other,
        }
    }

    /// Wait for the invocation holding the slot to finish writing its address.
    async fn read_winner(&self) -> Option<ServerAddress> {
        let deadline = Instant::now() + self.timings.reconcile_timeout;
        loop {
            if let Some(address) = self.registry.read() {
                return Some(address);
            }
            if Instant::now() >= deadline {
                return None;
            }
            sleep(self.timings.reconcile_interval).await;
        }
    }

    async fn launch(&self, address: ServerAddress, targets: &[FileTarget]) -> Result<Route> {
        let server = match self.remote.listen(&address).await {
            Ok(server) => server,
            Err(e) => {
                self.registry.clear();
                return Err(e);
            }
        };

        sleep(self.timings.server_start_delay).await;

        let report = self.dispatch(&address, targets).await;
        Ok(Route::Launched {
            address,
            server,
            report,
        })
    }

    /// Attach to the server of the invocation that won the slot.
    ///
    /// The winner records its address before its server listens, so it is
    /// given time to come up; its entry is never self-healed from here.
    async fn join_winner(&self, address: ServerAddress, targets: &[FileTarget]) -> Result<Route> {
        info!("Lost the launch race; joining server {}", address);

        let probe = LivenessProbe::new(&self.remote);
        let deadline = Instant::now() + self.timings.reconcile_timeout;
        while !probe.check(&address).await {
            if Instant::now() >= deadline {
                warn!("Server {} did not answer in time; sending anyway", address);
                break;
            }
            sleep(self.timings.reconcile_interval).await;
        }

        let report = self.dispatch(&address, targets).await;
        Ok(Route::Joined { address, report })
    }

    async fn dispatch(&self, address: &ServerAddress, targets: &[FileTarget]) -> DispatchReport {
        Dispatcher::new(&self.remote).dispatch(address, targets).await
    }

    /// Block until the launched server stops answering, then release the slot.
    ///
    /// Runs for the lifetime of the server.
    pub async fn wait_for_exit(&self, address: &ServerAddress, server: &mut LaunchedServer) {
        let probe = LivenessProbe::new(&self.remote);

        loop {
            sleep(self.timings.poll_interval).await;

            if let Some(status) = server.try_exit_status() {
                info!("Server process exited with {}", status);
                break;
            }
            if !probe.check(address).await {
                info!("Server {} stopped answering", address);
                break;
            }
        }

        // Leave a slot that names some other server alone.
        match self.registry.read() {
            Some(current) if &current != address => {
                debug!("Registry now names {}; not clearing", current);
            }
            _ => self.registry.clear(),
        }
    }
}
