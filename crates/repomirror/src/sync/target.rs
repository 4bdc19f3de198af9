//! Store backends a sync pass can reconcile into.

use async_trait::async_trait;

use super::progress::{ProgressCallback, SyncProgress, emit};
use crate::record::Record;
use crate::store::{
    self, DeleteOutcome, KeyEvent, KeyValueStore, ReconcileStrategy, RelationalStore,
    reconcile_keys,
};

/// What a target did with the records it was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Records written.
    pub applied: usize,
    /// Existing entries removed.
    pub deleted: usize,
}

/// A store a sync pass writes fetched records into.
#[async_trait]
pub trait SyncTarget: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Whether an empty remote listing ends the pass cleanly instead of
    /// failing it.
    fn tolerates_empty(&self) -> bool;

    /// Replace the stored state with `records`, sequentially.
    async fn apply(
        &self,
        records: &[Record],
        on_progress: Option<&ProgressCallback>,
    ) -> store::Result<ApplyOutcome>;
}

#[async_trait]
impl SyncTarget for RelationalStore {
    fn name(&self) -> &'static str {
        "relational"
    }

    fn tolerates_empty(&self) -> bool {
        false
    }

    async fn apply(
        &self,
        records: &[Record],
        on_progress: Option<&ProgressCallback>,
    ) -> store::Result<ApplyOutcome> {
        self.ping().await?;
        self.rebuild_schema().await?;
        emit(on_progress, SyncProgress::SchemaRebuilt);

        let ids = self
            .insert_all_with(records, |record| {
                emit(
                    on_progress,
                    SyncProgress::Persisted {
                        name: record.name.clone(),
                    },
                );
            })
            .await?;

        Ok(ApplyOutcome {
            applied: ids.len(),
            deleted: 0,
        })
    }
}

/// Key-value target: a [`KeyValueStore`] plus the strategy for existing keys.
#[derive(Debug, Clone)]
pub struct KvTarget<K> {
    store: K,
    strategy: ReconcileStrategy,
}

impl<K: KeyValueStore> KvTarget<K> {
    pub fn new(store: K, strategy: ReconcileStrategy) -> Self {
        Self { store, strategy }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn strategy(&self) -> ReconcileStrategy {
        self.strategy
    }
}

#[async_trait]
impl<K: KeyValueStore> SyncTarget for KvTarget<K> {
    fn name(&self) -> &'static str {
        "kv"
    }

    fn tolerates_empty(&self) -> bool {
        true
    }

    async fn apply(
        &self,
        records: &[Record],
        on_progress: Option<&ProgressCallback>,
    ) -> store::Result<ApplyOutcome> {
        let counts = reconcile_keys(&self.store, records, self.strategy, |event| {
            let progress = match event {
                KeyEvent::Listed { existing } => SyncProgress::KeysListed { existing },
                KeyEvent::Deleted { key, outcome } => SyncProgress::KeyDeleted {
                    key: key.to_string(),
                    existed: outcome == DeleteOutcome::Deleted,
                },
                KeyEvent::Set { key } => SyncProgress::Persisted {
                    name: key.to_string(),
                },
            };
            emit(on_progress, progress);
        })
        .await?;

        Ok(ApplyOutcome {
            applied: counts.set,
            deleted: counts.deleted,
        })
    }
}
