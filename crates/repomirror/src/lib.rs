//! Repomirror - mirrors repository metadata from GitHub into a local store.
//!
//! A sync pass lists an owner's repositories, normalizes each listing into a
//! [`Record`], and reconciles the records into one of two backends:
//!
//! - a relational `repos` table, dropped, recreated and refilled on every pass
//! - a flat key-value space keyed by repository name
//!
//! The relational data is then served read-only by [`api`].
//!
//! # Features
//!
//! - `github` (default) - the `octocrab`-backed [`source::GitHubSource`].
//!
//! # Example
//!
//! ```ignore
//! use repomirror::{RelationalStore, SyncEngine, SyncOptions, connect};
//! use repomirror::source::GitHubSource;
//!
//! let db = connect("sqlite://repomirror.db?mode=rwc").await?;
//! let store = RelationalStore::new(db);
//! let engine = SyncEngine::new(GitHubSource::new(None)?, SyncOptions::new("permalik"));
//! let report = engine.run(&store, None).await?;
//! ```

pub mod api;
pub mod db;
pub mod entity;
pub mod record;
pub mod source;
pub mod store;
pub mod sync;

pub use db::connect;
pub use entity::prelude::*;
pub use record::{CachePayload, RawListing, Record, RepoView, to_record};
pub use store::{
    KeyValueStore, MemoryKeyValueStore, ReconcileStrategy, RelationalStore, SqlKeyValueStore,
    StoreError, StoreTimeouts,
};
pub use sync::{KvTarget, SyncEngine, SyncError, SyncOptions, SyncPhase, SyncReport};
