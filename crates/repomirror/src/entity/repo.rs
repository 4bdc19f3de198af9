//! Repo entity - the rebuilt-per-pass `repos` table.
//!
//! Column names and widths are a fixed contract read by other tooling; the
//! DDL lives in [`crate::store::relational`] and must stay in step with this
//! model.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::record::RepoView;

/// Row of the `repos` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repos")]
pub struct Model {
    /// Generated primary key, unrelated to the remote identifier.
    #[sea_orm(primary_key)]
    pub id: i32,

    pub owner: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub html_url: String,
    pub homepage: String,

    /// Comma-joined topics.
    #[sea_orm(column_type = "Text")]
    pub topics: String,

    /// Day-precision date (`YYYY-MM-DD`).
    pub created_at: String,
    /// Day-precision date (`YYYY-MM-DD`).
    pub updated_at: String,

    /// Remote numeric identifier. Not unique-constrained.
    pub uid: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for RepoView {
    fn from(model: Model) -> Self {
        Self {
            owner: model.owner,
            name: model.name,
            category: model.category,
            description: model.description,
            html_url: model.html_url,
            homepage: model.homepage,
            topics: model.topics,
            created_at: model.created_at,
            updated_at: model.updated_at,
            uid: i64::from(model.uid),
        }
    }
}
