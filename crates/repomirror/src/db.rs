//! Database connection utilities.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Configure SQLite pragmas for a file-backed database.
///
/// - `journal_mode=WAL` so the read API is not blocked by a running pass
/// - `busy_timeout=5000` to wait on locks instead of failing immediately
async fn configure_sqlite(db: &DatabaseConnection) -> Result<(), DbErr> {
    for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA busy_timeout=5000"] {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            pragma.to_string(),
        ))
        .await?;
    }
    Ok(())
}

/// Establish a connection to the database.
///
/// Accepts any URL SeaORM understands (`postgres://...`, `sqlite://...`,
/// `sqlite::memory:`). File-backed SQLite databases get WAL mode and a busy
/// timeout. No schema is created here; each store manages its own table.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    if database_url.starts_with("sqlite://") {
        configure_sqlite(&db).await?;
    }

    tracing::debug!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}
