use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::errors::Result;
use crate::record::RawListing;

/// Only the first page is ever requested.
pub const LIST_PAGE: u32 = 1;

/// Fixed page size of the single listing request.
pub const LIST_PER_PAGE: u8 = 25;

/// Sort order requested from the remote.
pub const LIST_SORT: &str = "created";

/// Visibility filter requested from the remote.
pub const LIST_VISIBILITY: &str = "public";

/// Default deadline for the single remote call.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether an owner is a user account or an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnerKind {
    #[default]
    User,
    Organization,
}

impl OwnerKind {
    /// Pick the kind from an organization flag.
    pub fn from_flag(is_organization: bool) -> Self {
        if is_organization {
            Self::Organization
        } else {
            Self::User
        }
    }

    /// REST route listing this owner's repositories.
    pub fn listing_route(self, owner: &str) -> String {
        match self {
            Self::User => format!("/users/{}/repos", owner),
            Self::Organization => format!("/orgs/{}/repos", owner),
        }
    }
}

/// Query parameters of the listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub visibility: &'static str,
    pub sort: &'static str,
    pub per_page: u8,
    pub page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            visibility: LIST_VISIBILITY,
            sort: LIST_SORT,
            per_page: LIST_PER_PAGE,
            page: LIST_PAGE,
        }
    }
}

/// A remote that can list an owner's repositories.
///
/// Implementations make exactly one request per call and never retry.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// List the first page of repositories for `owner`.
    async fn list_repositories(
        &self,
        owner: &str,
        kind: OwnerKind,
        query: &ListQuery,
    ) -> Result<Vec<RawListing>>;
}
