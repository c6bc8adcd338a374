pub mod courses;
pub mod enrollments;
pub mod lifecycle;
pub mod periods;
pub mod students;

use std::str::FromStr;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub use lifecycle::{SoftDeletable, get_by_id, list_deleted, restore, soft_delete};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Single-connection in-memory database with the schema applied. Every
/// connection to `:memory:` is its own database, so the pool never opens a
/// second one nor recycles the first.
pub async fn connect_in_memory() -> Result<SqlitePool, MigrateError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(db: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(db).await
}

/// `LIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Appends a case-insensitive substring filter on `column`.
pub(crate) fn push_contains(query: &mut QueryBuilder<'_, Sqlite>, column: &str, term: &str) {
    query
        .push(format!(" AND {} LIKE ", column))
        .push_bind(contains_pattern(term))
        .push(" ESCAPE '\\'");
}
