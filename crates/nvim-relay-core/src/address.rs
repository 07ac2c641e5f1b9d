//! Server addresses.

use crate::platform;
use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Last timestamp handed out by [`ServerAddress::generate`] in this process.
static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Opaque connection string of an editor server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress(String);

impl ServerAddress {
    /// Wrap an existing address, trimming surrounding whitespace.
    ///
    /// Returns `None` for an empty or whitespace-only string.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Generate a fresh address for a new server.
    ///
    /// Embeds the process id and a nanosecond timestamp that is strictly
    /// increasing within this process, so no two launches share an address.
    pub fn generate() -> Self {
        let stamp = next_stamp(Utc::now().timestamp_nanos_opt().unwrap_or_default());
        let unique = format!("{}-{}", std::process::id(), stamp);
        Self(platform::server_address(&unique))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn next_stamp(now: i64) -> i64 {
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ServerAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
