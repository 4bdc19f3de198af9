//! Sync engine: one end-to-end pass of fetch, transform and reconcile.
//!
//! # Example
//!
//! ```ignore
//! use repomirror::sync::{SyncEngine, SyncOptions};
//!
//! let engine = SyncEngine::new(source, SyncOptions::new("permalik"));
//! let report = engine.run(&relational_store, Some(&progress)).await?;
//! println!("Applied {} repos", report.applied);
//! ```

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::target::SyncTarget;
use super::types::{Result, SyncError, SyncOptions, SyncPhase, SyncReport};
use crate::source::{RepositorySource, SourceError, fetch_repositories};

/// Tracks the current phase and announces every transition.
struct PhaseTracker<'a> {
    phase: SyncPhase,
    on_progress: Option<&'a ProgressCallback>,
}

impl<'a> PhaseTracker<'a> {
    fn new(on_progress: Option<&'a ProgressCallback>) -> Self {
        Self {
            phase: SyncPhase::Idle,
            on_progress,
        }
    }

    fn advance(&mut self, to: SyncPhase) -> Result<()> {
        let from = self.phase;
        if !from.can_transition_to(to) {
            return Err(SyncError::InvalidTransition { from, to });
        }
        self.phase = to;
        tracing::debug!(%from, %to, "Sync phase changed");
        emit(self.on_progress, SyncProgress::PhaseChanged { from, to });
        Ok(())
    }

    /// Move to `Failed` and hand the error back.
    fn fail(&mut self, err: SyncError) -> SyncError {
        if let Err(transition) = self.advance(SyncPhase::Failed) {
            tracing::warn!(error = %transition, "Could not mark pass as failed");
        }
        err
    }
}

/// Drives sync passes for one owner against any [`SyncTarget`].
pub struct SyncEngine<S> {
    source: S,
    options: SyncOptions,
}

impl<S: RepositorySource> SyncEngine<S> {
    pub fn new(source: S, options: SyncOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run one pass: fetch every listing, then apply it to `target`.
    ///
    /// Fetching completes before anything is written. Any error moves the
    /// pass to `Failed` and is returned unchanged; there is no retry. An
    /// empty listing fails the pass unless the target tolerates it, in
    /// which case the pass still goes through `Reconciling` but the target
    /// is never called and its contents are left as they were.
    pub async fn run<T>(
        &self,
        target: &T,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<SyncReport>
    where
        T: SyncTarget + ?Sized,
    {
        let owner = self.options.owner.as_str();
        let mut tracker = PhaseTracker::new(on_progress);
        let mut report = SyncReport {
            owner: owner.to_string(),
            ..Default::default()
        };

        tracker.advance(SyncPhase::Fetching)?;
        emit(
            on_progress,
            SyncProgress::FetchingRepos {
                owner: owner.to_string(),
                organization: self.options.organization,
            },
        );

        let records = match fetch_repositories(
            &self.source,
            owner,
            self.options.organization,
            self.options.remote_timeout,
        )
        .await
        {
            Ok(records) => records,
            Err(SourceError::Empty { .. }) if target.tolerates_empty() => {
                emit(
                    on_progress,
                    SyncProgress::EmptyListing {
                        owner: owner.to_string(),
                        tolerated: true,
                    },
                );
                tracing::info!(
                    owner,
                    target = target.name(),
                    "No repositories listed, nothing to apply"
                );
                tracker.advance(SyncPhase::Reconciling)?;
                tracker.advance(SyncPhase::Done)?;
                report.phase = SyncPhase::Done;
                emit(
                    on_progress,
                    SyncProgress::Complete {
                        applied: 0,
                        deleted: 0,
                    },
                );
                return Ok(report);
            }
            Err(err) => {
                if err.is_empty_result() {
                    emit(
                        on_progress,
                        SyncProgress::EmptyListing {
                            owner: owner.to_string(),
                            tolerated: false,
                        },
                    );
                }
                return Err(tracker.fail(err.into()));
            }
        };

        report.fetched = records.len();
        emit(
            on_progress,
            SyncProgress::FetchComplete {
                owner: owner.to_string(),
                total: records.len(),
            },
        );

        tracker.advance(SyncPhase::Reconciling)?;

        let outcome = match target.apply(&records, on_progress).await {
            Ok(outcome) => outcome,
            Err(err) => return Err(tracker.fail(err.into())),
        };

        report.applied = outcome.applied;
        report.deleted = outcome.deleted;

        tracker.advance(SyncPhase::Done)?;
        report.phase = SyncPhase::Done;

        emit(
            on_progress,
            SyncProgress::Complete {
                applied: report.applied,
                deleted: report.deleted,
            },
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::record::{RawListing, Record};
    use crate::source::{ListQuery, OwnerKind};
    use crate::store::{self, KeyValueStore, MemoryKeyValueStore, ReconcileStrategy, StoreError};
    use crate::sync::target::{ApplyOutcome, KvTarget};

    struct FixedSource(Vec<RawListing>);

    #[async_trait]
    impl RepositorySource for FixedSource {
        async fn list_repositories(
            &self,
            _owner: &str,
            _kind: OwnerKind,
            _query: &ListQuery,
        ) -> crate::source::Result<Vec<RawListing>> {
            Ok(self.0.clone())
        }
    }

    struct DownSource;

    #[async_trait]
    impl RepositorySource for DownSource {
        async fn list_repositories(
            &self,
            owner: &str,
            _kind: OwnerKind,
            _query: &ListQuery,
        ) -> crate::source::Result<Vec<RawListing>> {
            Err(SourceError::unavailable(owner, "503 Service Unavailable"))
        }
    }

    /// Target that records what it was asked to apply.
    #[derive(Default)]
    struct RecordingTarget {
        tolerates_empty: bool,
        fail_with_integrity: bool,
        applied: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SyncTarget for RecordingTarget {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn tolerates_empty(&self) -> bool {
            self.tolerates_empty
        }

        async fn apply(
            &self,
            records: &[Record],
            _on_progress: Option<&ProgressCallback>,
        ) -> store::Result<ApplyOutcome> {
            if self.fail_with_integrity {
                return Err(StoreError::WriteIntegrity {
                    name: records[0].name.clone(),
                    affected: 0,
                });
            }
            let mut applied = self.applied.lock().unwrap();
            applied.extend(records.iter().map(|r| r.name.clone()));
            Ok(ApplyOutcome {
                applied: records.len(),
                deleted: 0,
            })
        }
    }

    fn listing(name: &str) -> RawListing {
        RawListing {
            id: 1,
            full_name: format!("permalik/{}", name),
            ..Default::default()
        }
    }

    fn phase_recorder() -> (ProgressCallback, Arc<Mutex<Vec<SyncPhase>>>) {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        let callback: ProgressCallback = Box::new(move |event| {
            if let SyncProgress::PhaseChanged { to, .. } = event {
                sink.lock().unwrap().push(to);
            }
        });
        (callback, phases)
    }

    #[tokio::test]
    async fn test_successful_pass_reports_counts() {
        let engine = SyncEngine::new(
            FixedSource(vec![listing("one"), listing("two")]),
            SyncOptions::new("permalik"),
        );
        let target = RecordingTarget::default();
        let (callback, phases) = phase_recorder();

        let report = engine.run(&target, Some(&callback)).await.unwrap();

        assert_eq!(report.fetched, 2);
        assert_eq!(report.applied, 2);
        assert_eq!(report.phase, SyncPhase::Done);
        assert_eq!(*target.applied.lock().unwrap(), vec!["one", "two"]);
        assert_eq!(
            *phases.lock().unwrap(),
            vec![SyncPhase::Fetching, SyncPhase::Reconciling, SyncPhase::Done]
        );
    }

    #[tokio::test]
    async fn test_empty_listing_fails_intolerant_target() {
        let engine = SyncEngine::new(FixedSource(Vec::new()), SyncOptions::new("permalik"));
        let target = RecordingTarget::default();
        let (callback, phases) = phase_recorder();

        let err = engine.run(&target, Some(&callback)).await.unwrap_err();

        assert!(matches!(err, SyncError::Source(SourceError::Empty { .. })));
        assert!(target.applied.lock().unwrap().is_empty());
        assert_eq!(
            *phases.lock().unwrap(),
            vec![SyncPhase::Fetching, SyncPhase::Failed]
        );
    }

    #[tokio::test]
    async fn test_empty_listing_skips_apply_on_tolerant_target() {
        let engine = SyncEngine::new(FixedSource(Vec::new()), SyncOptions::new("permalik"));
        let target = RecordingTarget {
            tolerates_empty: true,
            ..Default::default()
        };
        let (callback, phases) = phase_recorder();

        let report = engine.run(&target, Some(&callback)).await.unwrap();

        assert_eq!(report.applied, 0);
        assert_eq!(report.phase, SyncPhase::Done);
        assert!(target.applied.lock().unwrap().is_empty());
        assert_eq!(
            *phases.lock().unwrap(),
            vec![SyncPhase::Fetching, SyncPhase::Reconciling, SyncPhase::Done]
        );
    }

    #[tokio::test]
    async fn test_source_failure_never_reaches_target() {
        let engine = SyncEngine::new(DownSource, SyncOptions::new("permalik"));
        let target = RecordingTarget::default();

        let err = engine.run(&target, None).await.unwrap_err();

        assert!(matches!(err, SyncError::Source(SourceError::Unavailable { .. })));
        assert!(target.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_fails_pass() {
        let engine = SyncEngine::new(
            FixedSource(vec![listing("one")]),
            SyncOptions::new("permalik"),
        );
        let target = RecordingTarget {
            fail_with_integrity: true,
            ..Default::default()
        };
        let (callback, phases) = phase_recorder();

        let err = engine.run(&target, Some(&callback)).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Store(StoreError::WriteIntegrity { .. })
        ));
        assert_eq!(phases.lock().unwrap().last(), Some(&SyncPhase::Failed));
    }

    #[tokio::test]
    async fn test_kv_target_counts_deletes() {
        let store = MemoryKeyValueStore::new();
        store.set("a", b"old".to_vec()).await.unwrap();
        store.set("b", b"old".to_vec()).await.unwrap();

        let engine = SyncEngine::new(
            FixedSource(vec![listing("b"), listing("c")]),
            SyncOptions::new("permalik"),
        );
        let target = KvTarget::new(store.clone(), ReconcileStrategy::WipeAll);

        let report = engine.run(&target, None).await.unwrap();

        assert_eq!(report.deleted, 2);
        assert_eq!(report.applied, 2);
        let keys: Vec<String> = store.entries().await.into_keys().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_kv_target_empty_listing_keeps_keys() {
        let store = MemoryKeyValueStore::new();
        store.set("a", b"old".to_vec()).await.unwrap();

        let engine = SyncEngine::new(FixedSource(Vec::new()), SyncOptions::new("permalik"));
        let target = KvTarget::new(store.clone(), ReconcileStrategy::WipeAll);
        let (callback, phases) = phase_recorder();

        let report = engine.run(&target, Some(&callback)).await.unwrap();

        assert_eq!(report.phase, SyncPhase::Done);
        assert_eq!(report.deleted, 0);
        assert_eq!(
            *phases.lock().unwrap(),
            vec![SyncPhase::Fetching, SyncPhase::Reconciling, SyncPhase::Done]
        );
        assert_eq!(store.get("a").await, Some(b"old".to_vec()));
    }
}
