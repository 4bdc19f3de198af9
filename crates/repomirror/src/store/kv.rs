//! Key-value store adapter and the key reconciliation pass.
//!
//! Keys are repository short names; values are JSON-encoded
//! [`CachePayload`]s. Two implementations ship: [`SqlKeyValueStore`] over a
//! SeaORM table and [`MemoryKeyValueStore`] for tests and dry runs.

mod memory;
mod sql;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::{Result, StoreError};
use crate::record::{CachePayload, Record};

pub use memory::MemoryKeyValueStore;
pub use sql::SqlKeyValueStore;

/// Result of deleting a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The key was already gone. Not an error.
    KeyNotFound,
}

/// A flat key space holding encoded payloads.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Every key currently present, or `None` when the key space is empty.
    async fn list_keys(&self) -> Result<Option<BTreeSet<String>>>;

    /// Store `value` under `key` with no expiration, overwriting any value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove `key`.
    async fn delete(&self, key: &str) -> Result<DeleteOutcome>;
}

/// How existing keys are handled when the key space is non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileStrategy {
    /// Delete every existing key, then set every fetched record.
    #[default]
    WipeAll,
    /// Delete only keys absent from the fetched set, then set every record.
    Diff,
}

impl ReconcileStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WipeAll => "wipe-all",
            Self::Diff => "diff",
        }
    }
}

impl fmt::Display for ReconcileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReconcileStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wipe-all" | "wipe_all" | "wipeall" => Ok(Self::WipeAll),
            "diff" => Ok(Self::Diff),
            other => Err(format!(
                "unknown reconcile strategy '{}' (expected wipe-all or diff)",
                other
            )),
        }
    }
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyReconciliation {
    /// Keys removed (including overlap under `WipeAll`).
    pub deleted: usize,
    /// Deletes that found nothing to remove.
    pub missing: usize,
    /// Records written.
    pub set: usize,
}

/// Encode the key-value payload of a record.
pub fn encode_record(record: &Record) -> Result<Vec<u8>> {
    serde_json::to_vec(&CachePayload::from(record)).map_err(|e| StoreError::Serialization {
        key: record.name.clone(),
        message: e.to_string(),
    })
}

/// Store a record's payload under its name.
pub async fn set_record<K: KeyValueStore + ?Sized>(store: &K, record: &Record) -> Result<()> {
    let payload = encode_record(record)?;
    store.set(&record.name, payload).await
}

/// Progress notifications from [`reconcile_keys`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent<'a> {
    /// Existing keys were enumerated (0 when the key space was empty).
    Listed { existing: usize },
    Deleted { key: &'a str, outcome: DeleteOutcome },
    Set { key: &'a str },
}

/// Reconcile the key space so it holds exactly the fetched records.
///
/// With an empty key space every record is set. Otherwise keys are deleted
/// according to `strategy` before every record is set. Records are applied
/// sequentially, and the first error aborts the pass.
pub async fn reconcile_keys<K, F>(
    store: &K,
    records: &[Record],
    strategy: ReconcileStrategy,
    mut on_event: F,
) -> Result<KeyReconciliation>
where
    K: KeyValueStore + ?Sized,
    F: FnMut(KeyEvent<'_>) + Send,
{
    let mut counts = KeyReconciliation::default();

    let existing = store.list_keys().await?;
    on_event(KeyEvent::Listed {
        existing: existing.as_ref().map_or(0, BTreeSet::len),
    });

    if let Some(existing) = existing {
        let desired: BTreeSet<&str> = records.iter().map(|r| r.name.as_str()).collect();

        for key in &existing {
            if strategy == ReconcileStrategy::Diff && desired.contains(key.as_str()) {
                continue;
            }

            let outcome = store.delete(key).await?;
            match outcome {
                DeleteOutcome::Deleted => counts.deleted += 1,
                DeleteOutcome::KeyNotFound => {
                    tracing::debug!(key = %key, "Key already gone");
                    counts.missing += 1;
                }
            }
            on_event(KeyEvent::Deleted { key, outcome });
        }
    }

    for record in records {
        set_record(store, record).await?;
        counts.set += 1;
        on_event(KeyEvent::Set { key: &record.name });
    }

    Ok(counts)
}
