// ── Runtime core configuration ──
//
// Tuning knobs for the core. Never touches disk: the CLI (through
// `vpnctl-config`) builds a `CoreConfig` and hands it in.

use std::time::Duration;

/// Delay between `start()` and the automatic CONNECTED transition.
pub const DEFAULT_CONNECT_DELAY: Duration = Duration::from_secs(2);

/// Query-log entries kept while nobody is listening.
pub const DEFAULT_QUERY_LOG_BUFFER: usize = 256;

/// Configuration for a single [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// How long a started connection stays CONNECTING before it
    /// becomes CONNECTED.
    pub connect_delay: Duration,
    /// Populate the registry with example servers, profiles, and a
    /// request log entry.
    pub seed_mock_data: bool,
    /// Maximum number of query-log entries buffered for a late
    /// subscriber. Oldest entries are dropped first.
    pub query_log_buffer: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            connect_delay: DEFAULT_CONNECT_DELAY,
            seed_mock_data: true,
            query_log_buffer: DEFAULT_QUERY_LOG_BUFFER,
        }
    }
}

impl CoreConfig {
    /// An empty registry with the default timings. Handy for tests and
    /// embedders that bring their own data.
    pub fn empty() -> Self {
        Self {
            seed_mock_data: false,
            ..Self::default()
        }
    }
}
