//! Sending file targets to a server.

use crate::address::ServerAddress;
use crate::remote::{OpenRequest, RemoteEditor};
use crate::targets::FileTarget;
use tracing::{debug, warn};

/// How many open commands reached the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

impl DispatchReport {
    pub fn all_sent(&self) -> bool {
        self.failed == 0
    }
}

/// Sends one open command per target, in order.
///
/// Failures are logged and otherwise ignored; there is no retry or relaunch.
pub struct Dispatcher<'a, E: ?Sized> {
    remote: &'a E,
}

impl<'a, E: RemoteEditor + ?Sized> Dispatcher<'a, E> {
    pub fn new(remote: &'a E) -> Self {
        Self { remote }
    }

    pub async fn dispatch(&self, address: &ServerAddress, targets: &[FileTarget]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for target in targets {
            let request = OpenRequest::from(target);
            match self.remote.open(address, &request).await {
                Ok(()) => {
                    debug!("Opened {} on {}", target, address);
                    report.sent += 1;
                }
                Err(e) => {
                    warn!("Failed to open {} on {}: {}", target, address, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
