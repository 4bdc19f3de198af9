use std::future::Future;
use std::time::Duration;

use super::errors::{Result, StoreError};

/// Default deadline for the connectivity check.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(1);

/// Default deadline for each schema, insert, select, set or delete.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-operation deadlines for store adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimeouts {
    pub ping: Duration,
    pub operation: Duration,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self {
            ping: DEFAULT_PING_TIMEOUT,
            operation: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

impl StoreTimeouts {
    /// Use the same deadline for every operation except ping.
    #[must_use]
    pub fn with_operation(mut self, operation: Duration) -> Self {
        self.operation = operation;
        self
    }
}

/// Run `fut` under a deadline, abandoning it on expiry.
pub(crate) async fn with_deadline<F: Future>(
    operation: &'static str,
    after: Duration,
    fut: F,
) -> Result<F::Output> {
    tokio::time::timeout(after, fut).await.map_err(|_| {
        tracing::warn!(operation, ?after, "Store operation timed out");
        StoreError::Timeout { operation, after }
    })
}
