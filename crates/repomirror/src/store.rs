//! Store adapters that persist fetched records.
//!
//! - [`relational`] - drop/recreate the `repos` table and insert every record
//! - [`kv`] - reconcile a flat key space against the fetched names
//!
//! Every individual store operation runs under its own deadline (see
//! [`StoreTimeouts`]); expiry surfaces as [`StoreError::Timeout`].

mod deadline;
mod errors;
pub mod kv;
pub mod relational;

pub use deadline::{DEFAULT_OPERATION_TIMEOUT, DEFAULT_PING_TIMEOUT, StoreTimeouts};
pub use errors::{Result, StoreError};
pub use kv::{
    DeleteOutcome, KeyEvent, KeyReconciliation, KeyValueStore, MemoryKeyValueStore, ReconcileStrategy,
    SqlKeyValueStore, encode_record, reconcile_keys, set_record,
};
pub use relational::RelationalStore;
