//! Lookup, soft-delete and restore shared by every entity table.
//!
//! Rows are never removed; `is_deleted` hides them from every read that does
//! not explicitly ask for deleted rows.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Sqlite, SqliteConnection, SqlitePool};
use tracing::info;

use crate::error::AppError;
use crate::models::{Course, Period, Student};

pub trait SoftDeletable: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    const LABEL: &'static str;

    fn is_deleted(&self) -> bool;
}

impl SoftDeletable for Student {
    const TABLE: &'static str = "students";
    const LABEL: &'static str = "Student";

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl SoftDeletable for Course {
    const TABLE: &'static str = "courses";
    const LABEL: &'static str = "Course";

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl SoftDeletable for Period {
    const TABLE: &'static str = "periods";
    const LABEL: &'static str = "Period";

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

pub(crate) fn not_found<T: SoftDeletable>(id: i64) -> AppError {
    AppError::NotFound(format!("{} {} not found", T::LABEL, id))
}

/// Fetches a row whether or not it is deleted.
pub(crate) async fn find_any<T: SoftDeletable>(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<T>, sqlx::Error> {
    let sql = format!("SELECT * FROM {} WHERE id = ?1", T::TABLE);
    sqlx::query_as::<Sqlite, T>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Fetches a visible row; deleted rows are reported as missing.
pub(crate) async fn find_active<T: SoftDeletable>(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<T, AppError> {
    match find_any::<T>(conn, id).await? {
        Some(row) if !row.is_deleted() => Ok(row),
        _ => Err(not_found::<T>(id)),
    }
}

async fn set_deleted<T: SoftDeletable>(
    conn: &mut SqliteConnection,
    id: i64,
    deleted: bool,
) -> Result<T, AppError> {
    let row = find_any::<T>(&mut *conn, id)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;

    if row.is_deleted() == deleted {
        let state = if deleted { "already deleted" } else { "not deleted" };
        return Err(AppError::InvalidState(format!("{} {} is {}", T::LABEL, id, state)));
    }

    let sql = format!("UPDATE {} SET is_deleted = ?1 WHERE id = ?2", T::TABLE);
    sqlx::query(&sql)
        .bind(deleted)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    find_any::<T>(conn, id)
        .await?
        .ok_or_else(|| not_found::<T>(id))
}

pub async fn get_by_id<T: SoftDeletable>(db: &SqlitePool, id: i64) -> Result<T, AppError> {
    let mut tx = db.begin().await?;
    let row = find_active::<T>(&mut tx, id).await?;
    tx.commit().await?;
    Ok(row)
}

pub async fn soft_delete<T: SoftDeletable>(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = db.begin().await?;
    set_deleted::<T>(&mut tx, id, true).await?;
    tx.commit().await?;

    info!("{} {} soft-deleted", T::LABEL, id);
    Ok(())
}

pub async fn restore<T: SoftDeletable>(db: &SqlitePool, id: i64) -> Result<T, AppError> {
    let mut tx = db.begin().await?;
    let row = set_deleted::<T>(&mut tx, id, false).await?;
    tx.commit().await?;

    info!("{} {} restored", T::LABEL, id);
    Ok(row)
}

pub async fn list_deleted<T: SoftDeletable>(db: &SqlitePool) -> Result<Vec<T>, AppError> {
    let sql = format!("SELECT * FROM {} WHERE is_deleted = 1 ORDER BY id", T::TABLE);
    let mut tx = db.begin().await?;
    let rows = sqlx::query_as::<Sqlite, T>(&sql).fetch_all(&mut *tx).await?;
    tx.commit().await?;
    Ok(rows)
}
