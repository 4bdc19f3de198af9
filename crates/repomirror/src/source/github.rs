//! GitHub implementation of [`RepositorySource`] on top of octocrab.

use std::sync::Arc;

use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::Repository as GitHubRepo;

use super::errors::{Result, SourceError, short_error_message};
use super::types::{ListQuery, OwnerKind, RepositorySource};
use crate::record::RawListing;

/// Create an Octocrab instance, authenticated when a token is given.
pub fn create_client(token: Option<&str>) -> Result<Octocrab> {
    let builder = match token {
        Some(token) if !token.is_empty() => Octocrab::builder().personal_token(token.to_string()),
        _ => Octocrab::builder(),
    };

    builder
        .build()
        .map_err(|e| SourceError::Client(short_error_message(&e)))
}

/// Convert a GitHub repository into a [`RawListing`].
pub fn to_raw_listing(repo: &GitHubRepo) -> RawListing {
    RawListing {
        id: repo.id.0 as i64,
        full_name: repo.full_name.clone().unwrap_or_default(),
        description: repo.description.clone().unwrap_or_default(),
        html_url: repo
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_default(),
        homepage: repo.homepage.clone().unwrap_or_default(),
        topics: repo.topics.clone().unwrap_or_default(),
        created_at: repo.created_at,
        updated_at: repo.updated_at,
    }
}

/// GitHub REST client listing public repositories of a user or organization.
#[derive(Clone)]
pub struct GitHubSource {
    inner: Arc<Octocrab>,
}

impl GitHubSource {
    /// Create a new source. Anonymous access is used when `token` is `None`.
    pub fn new(token: Option<&str>) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(create_client(token)?),
        })
    }
}

#[async_trait]
impl RepositorySource for GitHubSource {
    async fn list_repositories(
        &self,
        owner: &str,
        kind: OwnerKind,
        query: &ListQuery,
    ) -> Result<Vec<RawListing>> {
        let route = kind.listing_route(owner);

        let repos: Vec<GitHubRepo> = self
            .inner
            .get(&route, Some(query))
            .await
            .map_err(|e| {
                tracing::warn!(owner, route = %route, error = %short_error_message(&e), "Listing failed");
                SourceError::unavailable(owner, short_error_message(&e))
            })?;

        tracing::debug!(owner, count = repos.len(), "Listed repositories");

        Ok(repos.iter().map(to_raw_listing).collect())
    }
}
