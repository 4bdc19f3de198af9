//! Progress reporting for sync passes.
//!
//! The engine emits [`SyncProgress`] events through an optional callback;
//! the CLI turns them into log lines.

use super::types::SyncPhase;

/// Progress events emitted during a sync pass.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// The pass moved to a new phase.
    PhaseChanged {
        from: SyncPhase,
        to: SyncPhase,
    },

    /// Starting the remote listing call.
    FetchingRepos {
        /// Owner (user or organization) being listed.
        owner: String,
        /// Whether the organization endpoint is used.
        organization: bool,
    },

    /// Remote listing returned.
    FetchComplete {
        owner: String,
        /// Number of records fetched.
        total: usize,
    },

    /// The remote returned nothing.
    EmptyListing {
        owner: String,
        /// Whether the target tolerates this and ends the pass cleanly.
        tolerated: bool,
    },

    /// The relational table was dropped and recreated.
    SchemaRebuilt,

    /// A record was written to the target.
    Persisted {
        /// Repository short name.
        name: String,
    },

    /// Existing keys were enumerated.
    KeysListed {
        /// Number of keys found (0 for an empty key space).
        existing: usize,
    },

    /// A key was removed during reconciliation.
    KeyDeleted {
        key: String,
        /// False when the key was already gone.
        existed: bool,
    },

    /// The pass finished successfully.
    Complete {
        /// Records written.
        applied: usize,
        /// Keys deleted.
        deleted: usize,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_emit_with_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let callback: ProgressCallback = Box::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        emit(
            Some(&callback),
            SyncProgress::FetchComplete {
                owner: "permalik".to_string(),
                total: 10,
            },
        );
        emit(Some(&callback), SyncProgress::SchemaRebuilt);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_emit_without_callback() {
        emit(None, SyncProgress::SchemaRebuilt);
    }

    #[test]
    fn test_sync_progress_debug() {
        let event = SyncProgress::KeyDeleted {
            key: "utility".to_string(),
            existed: false,
        };

        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("KeyDeleted"));
        assert!(debug_str.contains("utility"));
    }
}
