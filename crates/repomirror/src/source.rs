//! Source fetcher: retrieves repository listings from the remote API.
//!
//! The remote call sits behind the [`RepositorySource`] trait so the sync
//! engine can be driven by the GitHub client in production and by a fake in
//! tests.
//!
//! # Example
//!
//! ```ignore
//! use repomirror::source::{GitHubSource, fetch_repositories};
//!
//! let source = GitHubSource::new(Some(&token))?;
//! let records = fetch_repositories(&source, "permalik", false, timeout).await?;
//! ```

mod errors;
mod fetch;
#[cfg(feature = "github")]
mod github;
mod types;

pub use errors::{Result, SourceError, short_error_message};
pub use fetch::fetch_repositories;
#[cfg(feature = "github")]
pub use github::GitHubSource;
pub use types::{
    DEFAULT_REMOTE_TIMEOUT, LIST_PAGE, LIST_PER_PAGE, LIST_SORT, LIST_VISIBILITY, ListQuery,
    OwnerKind, RepositorySource,
};
