use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::sea_query::{ColumnDef, OnConflict, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, QuerySelect, Set};

use super::{DeleteOutcome, KeyValueStore};
use crate::entity::repo_cache::{ActiveModel, Column, Entity as RepoCache};
use crate::store::deadline::{StoreTimeouts, with_deadline};
use crate::store::errors::{Result, StoreError};

/// `CREATE TABLE IF NOT EXISTS repo_cache (cache_key PK, payload BLOB)`.
pub fn create_table_statement() -> TableCreateStatement {
    Table::create()
        .table(RepoCache)
        .if_not_exists()
        .col(
            ColumnDef::new(Column::CacheKey)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Column::Payload).binary().not_null())
        .to_owned()
}

/// Key-value store persisted in the `repo_cache` table.
#[derive(Debug)]
pub struct SqlKeyValueStore {
    db: DatabaseConnection,
    timeouts: StoreTimeouts,
}

impl SqlKeyValueStore {
    /// Open the store, creating its table if missing.
    pub async fn open(db: DatabaseConnection, timeouts: StoreTimeouts) -> Result<Self> {
        let store = Self { db, timeouts };
        store.ensure_table().await?;
        Ok(store)
    }

    async fn ensure_table(&self) -> Result<()> {
        let stmt = self
            .db
            .get_database_backend()
            .build(&create_table_statement());

        with_deadline("create table", self.timeouts.operation, self.db.execute(stmt))
            .await?
            .map_err(|e| StoreError::Schema(format!("unable to create repo_cache: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqlKeyValueStore {
    async fn list_keys(&self) -> Result<Option<BTreeSet<String>>> {
        let keys: Vec<String> = with_deadline(
            "list keys",
            self.timeouts.operation,
            RepoCache::find()
                .select_only()
                .column(Column::CacheKey)
                .into_tuple::<String>()
                .all(&self.db),
        )
        .await??;

        if keys.is_empty() {
            return Ok(None);
        }
        Ok(Some(keys.into_iter().collect()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let model = ActiveModel {
            cache_key: Set(key.to_string()),
            payload: Set(value),
        };

        with_deadline(
            "set",
            self.timeouts.operation,
            RepoCache::insert(model)
                .on_conflict(
                    OnConflict::column(Column::CacheKey)
                        .update_column(Column::Payload)
                        .to_owned(),
                )
                .exec_without_returning(&self.db),
        )
        .await??;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<DeleteOutcome> {
        let result = with_deadline(
            "delete",
            self.timeouts.operation,
            RepoCache::delete_by_id(key.to_string()).exec(&self.db),
        )
        .await??;

        if result.rows_affected == 0 {
            Ok(DeleteOutcome::KeyNotFound)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }
}
