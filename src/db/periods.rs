use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::info;

use crate::db::lifecycle::find_active;
use crate::error::AppError;
use crate::models::{NewPeriodRequest, Period, PeriodQueryParams, UpdatePeriodRequest};
use crate::validation::Validate;

fn duplicate_period(year: i32, number: i32) -> String {
    format!("period {}-{} already exists", year, number)
}

/// Clears the flag on every period, deleted ones included, so a later restore
/// cannot bring back a second active period.
async fn deactivate_all(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE periods SET active = 0 WHERE active = 1")
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_period(db: &SqlitePool, req: NewPeriodRequest) -> Result<Period, AppError> {
    req.validate()?;

    let mut tx = db.begin().await?;
    if req.active {
        deactivate_all(&mut tx).await?;
    }
    let id = sqlx::query(
        r#"
        INSERT INTO periods (year, number, active, is_deleted)
        VALUES (?1, ?2, ?3, 0)
        "#,
    )
    .bind(req.year)
    .bind(req.number)
    .bind(req.active)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, || duplicate_period(req.year, req.number)))?
    .last_insert_rowid();
    tx.commit().await?;

    info!("created period {} ({}-{})", id, req.year, req.number);

    Ok(Period {
        id,
        year: req.year,
        number: req.number,
        active: req.active,
        is_deleted: false,
    })
}

pub async fn fetch_periods(
    db: &SqlitePool,
    params: &PeriodQueryParams,
) -> Result<Vec<Period>, AppError> {
    let page = params.page()?;

    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM periods WHERE 1 = 1");
    if !params.include_deleted {
        query.push(" AND is_deleted = 0");
    }
    if let Some(year) = params.year {
        query.push(" AND year = ").push_bind(year);
    }
    if let Some(number) = params.number {
        query.push(" AND number = ").push_bind(number);
    }
    if let Some(active) = params.active {
        query.push(" AND active = ").push_bind(active);
    }
    query
        .push(" ORDER BY id LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.skip);

    let mut tx = db.begin().await?;
    let periods = query.build_query_as::<Period>().fetch_all(&mut *tx).await?;
    tx.commit().await?;
    Ok(periods)
}

pub async fn update_period(
    db: &SqlitePool,
    id: i64,
    req: UpdatePeriodRequest,
) -> Result<Period, AppError> {
    req.validate()?;

    let mut tx = db.begin().await?;
    let mut current = find_active::<Period>(&mut tx, id).await?;
    req.apply_to(&mut current);

    sqlx::query("UPDATE periods SET year = ?1, number = ?2 WHERE id = ?3")
        .bind(current.year)
        .bind(current.number)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::conflict_on_unique(e, || duplicate_period(current.year, current.number))
        })?;
    tx.commit().await?;

    info!("updated period {}", id);
    Ok(current)
}

/// Makes `id` the only active period. Both steps share one transaction; a
/// missing target rolls back the deactivation.
pub async fn activate_period(db: &SqlitePool, id: i64) -> Result<Period, AppError> {
    let mut tx = db.begin().await?;
    let cleared = deactivate_all(&mut tx).await?;
    let mut period = find_active::<Period>(&mut tx, id).await?;

    sqlx::query("UPDATE periods SET active = 1 WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    period.active = true;
    info!("activated period {} (cleared {})", id, cleared);
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect_in_memory, get_by_id, restore, soft_delete};

    fn new_period(year: i32, number: i32, active: bool) -> NewPeriodRequest {
        NewPeriodRequest { year, number, active }
    }

    async fn active_periods(pool: &SqlitePool) -> Vec<Period> {
        let params = PeriodQueryParams { active: Some(true), ..Default::default() };
        fetch_periods(pool, &params).await.expect("Failed to fetch periods")
    }

    #[tokio::test]
    async fn test_activate_leaves_exactly_one_active() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let first = insert_period(&pool, new_period(2025, 1, false)).await.unwrap();
        let second = insert_period(&pool, new_period(2025, 2, false)).await.unwrap();
        let third = insert_period(&pool, new_period(2025, 3, false)).await.unwrap();

        activate_period(&pool, first.id).await.unwrap();
        activate_period(&pool, third.id).await.unwrap();
        let activated = activate_period(&pool, second.id).await.unwrap();
        assert!(activated.active);

        let active = active_periods(&pool).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);
    }

    #[tokio::test]
    async fn test_creating_active_period_deactivates_others() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let old = insert_period(&pool, new_period(2024, 2, true)).await.unwrap();
        let new = insert_period(&pool, new_period(2025, 1, true)).await.unwrap();

        let active = active_periods(&pool).await;
        assert_eq!(active, vec![new]);
        assert!(!get_by_id::<Period>(&pool, old.id).await.unwrap().active);
    }

    #[tokio::test]
    async fn test_activate_missing_period_keeps_current_active() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let current = insert_period(&pool, new_period(2025, 1, true)).await.unwrap();
        let deleted = insert_period(&pool, new_period(2025, 2, false)).await.unwrap();
        soft_delete::<Period>(&pool, deleted.id).await.unwrap();

        let err = activate_period(&pool, deleted.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = activate_period(&pool, 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert_eq!(active_periods(&pool).await, vec![current]);
    }

    #[tokio::test]
    async fn test_restored_period_does_not_compete_for_active() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let old = insert_period(&pool, new_period(2024, 1, true)).await.unwrap();
        soft_delete::<Period>(&pool, old.id).await.unwrap();

        let new = insert_period(&pool, new_period(2025, 1, false)).await.unwrap();
        activate_period(&pool, new.id).await.unwrap();

        let restored = restore::<Period>(&pool, old.id).await.unwrap();
        assert!(!restored.active);
        assert_eq!(active_periods(&pool).await.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_year_and_number_conflict() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        insert_period(&pool, new_period(2025, 1, false)).await.unwrap();
        let other = insert_period(&pool, new_period(2025, 2, false)).await.unwrap();

        let err = insert_period(&pool, new_period(2025, 1, false)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let req = UpdatePeriodRequest { number: Some(1), ..Default::default() };
        let err = update_period(&pool, other.id, req).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_filters_by_year_and_number() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let a = insert_period(&pool, new_period(2024, 1, false)).await.unwrap();
        let b = insert_period(&pool, new_period(2025, 1, false)).await.unwrap();
        insert_period(&pool, new_period(2025, 2, false)).await.unwrap();

        let params = PeriodQueryParams { number: Some(1), ..Default::default() };
        assert_eq!(fetch_periods(&pool, &params).await.unwrap(), vec![a, b.clone()]);

        let params = PeriodQueryParams { year: Some(2025), number: Some(1), ..Default::default() };
        assert_eq!(fetch_periods(&pool, &params).await.unwrap(), vec![b]);
    }
}
