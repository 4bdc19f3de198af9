//! Relational store adapter: full table rebuild followed by per-row inserts.
//!
//! The `repos` table is dropped (if present) and recreated on every pass, then
//! each record is inserted with `INSERT ... RETURNING id`. All inserts of a
//! pass share one transaction, so a failing insert leaves the freshly
//! rebuilt table empty instead of half-populated.

use std::future::Future;
use std::time::Duration;

use sea_orm::sea_query::{
    ColumnDef, InsertStatement, Query, SimpleExpr, Table, TableCreateStatement,
    TableDropStatement,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, TransactionTrait};

use super::deadline::{StoreTimeouts, with_deadline};
use super::errors::{Result, StoreError};
use crate::entity::repo::{Column, Entity as Repo};
use crate::record::{Record, RepoView, join_topics};

/// `DROP TABLE IF EXISTS repos`.
pub fn drop_table_statement() -> TableDropStatement {
    Table::drop().table(Repo).if_exists().to_owned()
}

/// `CREATE TABLE repos (...)` with the fixed column contract.
///
/// On Postgres this renders `id serial`, on SQLite an autoincrementing
/// integer primary key.
pub fn create_table_statement() -> TableCreateStatement {
    Table::create()
        .table(Repo)
        .col(
            ColumnDef::new(Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Column::Owner).string_len(100))
        .col(ColumnDef::new(Column::Name).string_len(100))
        .col(ColumnDef::new(Column::Category).string_len(100))
        .col(ColumnDef::new(Column::Description).string_len(200))
        .col(ColumnDef::new(Column::HtmlUrl).string_len(100))
        .col(ColumnDef::new(Column::Homepage).string_len(100))
        .col(ColumnDef::new(Column::Topics).text())
        .col(ColumnDef::new(Column::CreatedAt).string_len(10))
        .col(ColumnDef::new(Column::UpdatedAt).string_len(10))
        .col(ColumnDef::new(Column::Uid).integer())
        .to_owned()
}

/// Build the single-row insert for a record, returning the generated id.
pub fn insert_statement(record: &Record) -> Result<InsertStatement> {
    let uid = i32::try_from(record.uid).map_err(|_| StoreError::InvalidInput {
        message: format!("uid {} of {} does not fit an INT column", record.uid, record.name),
    })?;

    let values: [SimpleExpr; 10] = [
        record.owner.clone().into(),
        record.name.clone().into(),
        record.category.clone().into(),
        record.description.clone().into(),
        record.html_url.clone().into(),
        record.homepage.clone().into(),
        join_topics(&record.topics).into(),
        record.created_day().into(),
        record.updated_day().into(),
        uid.into(),
    ];

    let mut stmt = Query::insert();
    stmt.into_table(Repo).columns([
        Column::Owner,
        Column::Name,
        Column::Category,
        Column::Description,
        Column::HtmlUrl,
        Column::Homepage,
        Column::Topics,
        Column::CreatedAt,
        Column::UpdatedAt,
        Column::Uid,
    ]);
    stmt.values(values).map_err(|e| StoreError::InvalidInput {
        message: e.to_string(),
    })?;
    stmt.returning_col(Column::Id);

    Ok(stmt)
}

/// Insert one record and check that exactly one row came back.
async fn insert_one<C: ConnectionTrait>(
    conn: &C,
    record: &Record,
    timeouts: &StoreTimeouts,
) -> Result<i32> {
    let stmt = conn
        .get_database_backend()
        .build(&insert_statement(record)?);

    let rows = with_deadline("insert", timeouts.operation, conn.query_all(stmt)).await??;

    if rows.len() != 1 {
        return Err(StoreError::WriteIntegrity {
            name: record.name.clone(),
            affected: rows.len() as u64,
        });
    }

    let id: i32 = rows[0].try_get("", "id")?;
    Ok(id)
}

/// Map both a failed and an expired connectivity check to `Unavailable`.
async fn check_reachable<F>(after: Duration, ping: F) -> Result<()>
where
    F: Future<Output = std::result::Result<(), DbErr>>,
{
    match with_deadline("ping", after, ping).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(StoreError::Unavailable(e.to_string())),
        Err(e) => Err(StoreError::Unavailable(e.to_string())),
    }
}

/// Relational store backed by a SeaORM connection.
#[derive(Debug)]
pub struct RelationalStore {
    db: DatabaseConnection,
    timeouts: StoreTimeouts,
}

impl RelationalStore {
    /// Create a store over an established connection with default deadlines.
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeouts: StoreTimeouts::default(),
        }
    }

    /// Override the per-operation deadlines.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: StoreTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// The underlying connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Consume the store and hand back its connection.
    pub fn into_connection(self) -> DatabaseConnection {
        self.db
    }

    /// Verify the database is reachable.
    pub async fn ping(&self) -> Result<()> {
        check_reachable(self.timeouts.ping, self.db.ping()).await
    }

    /// Drop the `repos` table if it exists and create it again.
    pub async fn rebuild_schema(&self) -> Result<()> {
        let backend = self.db.get_database_backend();

        with_deadline(
            "drop table",
            self.timeouts.operation,
            self.db.execute(backend.build(&drop_table_statement())),
        )
        .await?
        .map_err(|e| StoreError::Schema(format!("unable to drop table: {}", e)))?;

        with_deadline(
            "create table",
            self.timeouts.operation,
            self.db.execute(backend.build(&create_table_statement())),
        )
        .await?
        .map_err(|e| StoreError::Schema(format!("unable to create table: {}", e)))?;

        tracing::debug!("Rebuilt repos table");
        Ok(())
    }

    /// Insert every record, in order, inside a single transaction.
    ///
    /// Returns the generated primary keys. The first failing insert stops the
    /// loop and rolls back everything inserted so far.
    pub async fn insert_all(&self, records: &[Record]) -> Result<Vec<i32>> {
        self.insert_all_with(records, |_| {}).await
    }

    /// Like [`insert_all`](Self::insert_all), calling `on_inserted` after each row.
    pub async fn insert_all_with<F>(&self, records: &[Record], mut on_inserted: F) -> Result<Vec<i32>>
    where
        F: FnMut(&Record) + Send,
    {
        let txn = with_deadline("begin", self.timeouts.operation, self.db.begin()).await??;
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            match insert_one(&txn, record, &self.timeouts).await {
                Ok(id) => {
                    ids.push(id);
                    on_inserted(record);
                }
                Err(e) => {
                    tracing::warn!(name = %record.name, error = %e, "Insert failed, rolling back");
                    match with_deadline("rollback", self.timeouts.operation, txn.rollback()).await {
                        Ok(Ok(())) => {}
                        Ok(Err(rollback_err)) => {
                            tracing::warn!(error = %rollback_err, "Rollback failed");
                        }
                        Err(timeout) => tracing::warn!(error = %timeout, "Rollback failed"),
                    }
                    return Err(e);
                }
            }
        }

        with_deadline("commit", self.timeouts.operation, txn.commit()).await??;
        Ok(ids)
    }

    /// Read every row back in storage order.
    pub async fn select_all(&self) -> Result<Vec<RepoView>> {
        let models = with_deadline("select", self.timeouts.operation, Repo::find().all(&self.db))
            .await??;
        Ok(models.into_iter().map(RepoView::from).collect())
    }
}
