//! Centralized configuration for nvim-relay.
//!
//! Constants for file names, editor invocation, and the delays that make up
//! the coordination protocol's timing.

use std::time::Duration;

/// Application-level configuration.
pub struct RelayConfig;

impl RelayConfig {
    pub const APP_NAME: &'static str = "nvim-relay";
    pub const DEFAULT_EDITOR: &'static str = "nvim";
    pub const REGISTRY_FILE_NAME: &'static str = "nvim-unity-server.txt";
    pub const ADDRESS_PREFIX: &'static str = "nvim-unity-";
    pub const EDITOR_ENV_VAR: &'static str = "NVIM_RELAY_EDITOR";
    pub const REGISTRY_ENV_VAR: &'static str = "NVIM_RELAY_REGISTRY";

    /// IDE startup flags passed through to the external editor that carry no
    /// meaning here.
    pub const INERT_TOKENS: &'static [&'static str] = &[
        "nosplash",
        "dontReopenProjects",
        "disableNonBundledPlugins",
        "--wait",
    ];

    /// Solution files are passed alongside targets but are never opened.
    pub const SOLUTION_SUFFIX: &'static str = ".sln";
}

/// Delays and timeouts of the coordination protocol.
pub struct TimingConfig;

impl TimingConfig {
    pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
    pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);
    pub const SERVER_START_DELAY: Duration = Duration::from_millis(800);
    pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
    pub const ATTACH_EXIT_DELAY: Duration = Duration::from_secs(1);
    pub const ERROR_EXIT_DELAY: Duration = Duration::from_secs(2);
    pub const RECONCILE_TIMEOUT: Duration = Duration::from_secs(5);
    pub const RECONCILE_INTERVAL: Duration = Duration::from_millis(200);
}

/// Runtime timings, defaulting to [`TimingConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub probe_timeout: Duration,
    pub dispatch_timeout: Duration,
    pub server_start_delay: Duration,
    pub poll_interval: Duration,
    pub reconcile_timeout: Duration,
    pub reconcile_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            probe_timeout: TimingConfig::PROBE_TIMEOUT,
            dispatch_timeout: TimingConfig::DISPATCH_TIMEOUT,
            server_start_delay: TimingConfig::SERVER_START_DELAY,
            poll_interval: TimingConfig::POLL_INTERVAL,
            reconcile_timeout: TimingConfig::RECONCILE_TIMEOUT,
            reconcile_interval: TimingConfig::RECONCILE_INTERVAL,
        }
    }
}

impl Timings {
    /// Set the pause between launching a server and the first dispatch.
    pub fn with_server_start_delay(mut self, delay: Duration) -> Self {
        self.server_start_delay = delay;
        self
    }

    /// Set the wait loop's polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_reasonable() {
        assert!(TimingConfig::PROBE_TIMEOUT > Duration::ZERO);
        assert!(TimingConfig::PROBE_TIMEOUT < TimingConfig::POLL_INTERVAL * 2);
        assert!(TimingConfig::RECONCILE_INTERVAL < TimingConfig::RECONCILE_TIMEOUT);
    }

    #[test]
    fn test_timings_builder() {
        let timings = Timings::default()
            .with_server_start_delay(Duration::ZERO)
            .with_poll_interval(Duration::from_millis(10));

        assert_eq!(timings.server_start_delay, Duration::ZERO);
        assert_eq!(timings.poll_interval, Duration::from_millis(10));
        assert_eq!(timings.probe_timeout, TimingConfig::PROBE_TIMEOUT);
    }
}
