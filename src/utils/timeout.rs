//! Timeout Defaults
//!
//! Shared duration constants for connection handling. Config defaults and
//! the transport layer both read from here so the two never drift apart.

use std::time::Duration;

/// Close a connection after this long without a complete read
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a graceful shutdown waits for workers to drain
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll interval while waiting for connections to drain during shutdown
pub const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(500);
