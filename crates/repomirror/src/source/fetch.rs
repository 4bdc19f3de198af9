use std::time::Duration;

use super::errors::{Result, SourceError};
use super::types::{ListQuery, OwnerKind, RepositorySource};
use crate::record::{Record, to_record};

/// Fetch and normalize the first page of an owner's repositories.
///
/// The remote call is bounded by `timeout`; expiry is reported as
/// [`SourceError::Unavailable`]. An empty listing is reported as
/// [`SourceError::Empty`] and callers decide whether that is fatal.
pub async fn fetch_repositories<S: RepositorySource + ?Sized>(
    source: &S,
    owner: &str,
    is_organization: bool,
    timeout: Duration,
) -> Result<Vec<Record>> {
    let kind = OwnerKind::from_flag(is_organization);
    let query = ListQuery::default();

    tracing::debug!(owner, ?kind, per_page = query.per_page, "Listing repositories");

    let listings = tokio::time::timeout(timeout, source.list_repositories(owner, kind, &query))
        .await
        .map_err(|_| {
            SourceError::unavailable(owner, format!("timed out after {:?}", timeout))
        })??;

    if listings.is_empty() {
        return Err(SourceError::Empty {
            owner: owner.to_string(),
        });
    }

    Ok(listings.into_iter().map(to_record).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::record::RawListing;

    struct StubSource {
        listings: Vec<RawListing>,
        calls: Mutex<Vec<(String, OwnerKind, ListQuery)>>,
    }

    impl StubSource {
        fn new(listings: Vec<RawListing>) -> Self {
            Self {
                listings,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RepositorySource for StubSource {
        async fn list_repositories(
            &self,
            owner: &str,
            kind: OwnerKind,
            query: &ListQuery,
        ) -> Result<Vec<RawListing>> {
            self.calls
                .lock()
                .unwrap()
                .push((owner.to_string(), kind, query.clone()));
            Ok(self.listings.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RepositorySource for FailingSource {
        async fn list_repositories(
            &self,
            owner: &str,
            _kind: OwnerKind,
            _query: &ListQuery,
        ) -> Result<Vec<RawListing>> {
            Err(SourceError::unavailable(owner, "403 rate limited"))
        }
    }

    struct SlowSource;

    #[async_trait]
    impl RepositorySource for SlowSource {
        async fn list_repositories(
            &self,
            _owner: &str,
            _kind: OwnerKind,
            _query: &ListQuery,
        ) -> Result<Vec<RawListing>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    fn listing(full_name: &str) -> RawListing {
        RawListing {
            full_name: full_name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_preserves_order_and_uses_fixed_query() {
        let source = StubSource::new(vec![listing("o/b"), listing("o/a"), listing("o/c")]);

        let records = fetch_repositories(&source, "o", true, Duration::from_secs(1))
            .await
            .unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "o");
        assert_eq!(calls[0].1, OwnerKind::Organization);
        assert_eq!(calls[0].2, ListQuery::default());
    }

    #[tokio::test]
    async fn test_fetch_empty_listing_is_an_error() {
        let source = StubSource::new(Vec::new());

        let err = fetch_repositories(&source, "nobody", false, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(err.is_empty_result());
        assert!(err.to_string().contains("nobody"));
    }

    #[tokio::test]
    async fn test_fetch_propagates_remote_failure() {
        let err = fetch_repositories(&FailingSource, "o", false, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_times_out() {
        let err = fetch_repositories(&SlowSource, "o", false, Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            SourceError::Unavailable { message, .. } => assert!(message.contains("timed out")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
