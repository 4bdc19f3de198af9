//! Sync pass types: phases, options, report and errors.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::source::{DEFAULT_REMOTE_TIMEOUT, SourceError};
use crate::store::StoreError;

/// Phase of a sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    #[default]
    Idle,
    Fetching,
    Reconciling,
    Done,
    Failed,
}

impl SyncPhase {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: SyncPhase) -> bool {
        use SyncPhase::*;
        matches!(
            (self, next),
            (Idle, Fetching)
                | (Fetching, Reconciling)
                | (Fetching, Failed)
                | (Reconciling, Done)
                | (Reconciling, Failed)
        )
    }

    /// `Done` and `Failed` end a pass.
    pub fn is_terminal(self) -> bool {
        matches!(self, SyncPhase::Done | SyncPhase::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyncPhase::Idle => "idle",
            SyncPhase::Fetching => "fetching",
            SyncPhase::Reconciling => "reconciling",
            SyncPhase::Done => "done",
            SyncPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for one sync pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// User or organization whose repositories are mirrored.
    pub owner: String,
    /// List through the organization endpoint instead of the user endpoint.
    pub organization: bool,
    /// Deadline for the remote listing call.
    pub remote_timeout: Duration,
}

impl SyncOptions {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            organization: false,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn organization(mut self, organization: bool) -> Self {
        self.organization = organization;
        self
    }

    #[must_use]
    pub fn remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }
}

/// Outcome of a completed sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub owner: String,
    /// Records returned by the remote.
    pub fetched: usize,
    /// Records written to the target.
    pub applied: usize,
    /// Keys deleted (key-value target only).
    pub deleted: usize,
    /// Final phase; always `Done` for a returned report.
    pub phase: SyncPhase,
}

/// Errors that abort a sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid phase transition from {from} to {to}")]
    InvalidTransition { from: SyncPhase, to: SyncPhase },
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
