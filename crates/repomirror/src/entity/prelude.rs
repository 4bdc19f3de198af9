//! Common re-exports for convenient entity usage.

pub use super::repo::{
    ActiveModel as RepoActiveModel, Column as RepoColumn, Entity as Repo, Model as RepoModel,
};
pub use super::repo_cache::{
    ActiveModel as RepoCacheActiveModel, Column as RepoCacheColumn, Entity as RepoCache,
    Model as RepoCacheModel,
};
