//! Progress reporting for sync passes.
//!
//! Every [`SyncProgress`] event is turned into a structured `tracing` line.
//! Per-record events log at debug, phase and summary events at info.

use repomirror::sync::{ProgressCallback, SyncProgress};

/// Logging reporter using tracing for structured output.
#[derive(Debug, Default)]
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::PhaseChanged { from, to } => {
                tracing::debug!(%from, %to, "Phase changed");
            }

            SyncProgress::FetchingRepos {
                owner,
                organization,
            } => {
                tracing::info!(owner = %owner, organization, "Fetching repositories");
            }

            SyncProgress::FetchComplete { owner, total } => {
                tracing::info!(owner = %owner, total, "Fetch complete");
            }

            SyncProgress::EmptyListing { owner, tolerated } => {
                if tolerated {
                    tracing::info!(owner = %owner, "No repositories listed, nothing to do");
                } else {
                    tracing::error!(owner = %owner, "No repositories listed");
                }
            }

            SyncProgress::SchemaRebuilt => {
                tracing::info!("Rebuilt repos table");
            }

            SyncProgress::Persisted { name } => {
                tracing::debug!(repo = %name, "Saved");
            }

            SyncProgress::KeysListed { existing } => {
                tracing::info!(existing, "Listed existing keys");
            }

            SyncProgress::KeyDeleted { key, existed } => {
                if existed {
                    tracing::debug!(key = %key, "Deleted key");
                } else {
                    tracing::debug!(key = %key, "Key already absent");
                }
            }

            SyncProgress::Complete { applied, deleted } => {
                tracing::info!(applied, deleted, "Sync complete");
            }

            _ => {}
        }
    }

    /// Convert to a ProgressCallback for the library.
    pub fn into_callback(self) -> ProgressCallback {
        Box::new(move |event| self.handle(event))
    }
}
