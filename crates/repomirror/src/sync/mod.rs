//! Sync orchestration: one pass of fetch, transform and reconcile.
//!
//! # Module Structure
//!
//! - [`types`] - Phases, options, report and errors
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`target`] - Store backends a pass writes into
//! - [`engine`] - `SyncEngine`, which drives a pass through its phases
//!
//! # Example
//!
//! ```ignore
//! use repomirror::source::GitHubSource;
//! use repomirror::store::{MemoryKeyValueStore, ReconcileStrategy};
//! use repomirror::sync::{KvTarget, SyncEngine, SyncOptions};
//!
//! let engine = SyncEngine::new(GitHubSource::new(None)?, SyncOptions::new("permalik"));
//! let target = KvTarget::new(MemoryKeyValueStore::new(), ReconcileStrategy::Diff);
//! let report = engine.run(&target, None).await?;
//! ```

mod engine;
mod progress;
mod target;
mod types;

pub use engine::SyncEngine;
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use target::{ApplyOutcome, KvTarget, SyncTarget};
pub use types::{Result, SyncError, SyncOptions, SyncPhase, SyncReport};
