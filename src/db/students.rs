use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::db::push_contains;
use crate::db::lifecycle::find_active;
use crate::error::AppError;
use crate::models::{NewStudentRequest, Student, StudentQueryParams, UpdateStudentRequest};
use crate::validation::Validate;

fn duplicate_national_id(national_id: &str) -> String {
    format!("a student with national_id {} already exists", national_id)
}

pub async fn insert_student(
    db: &SqlitePool,
    req: NewStudentRequest,
) -> Result<Student, AppError> {
    req.validate()?;

    let mut tx = db.begin().await?;
    let id = sqlx::query(
        r#"
        INSERT INTO students (national_id, name, email, semester, is_deleted)
        VALUES (?1, ?2, ?3, ?4, 0)
        "#,
    )
    .bind(&req.national_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(req.semester)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, || duplicate_national_id(&req.national_id)))?
    .last_insert_rowid();
    tx.commit().await?;

    info!("created student {} ({})", id, req.national_id);

    Ok(Student {
        id,
        national_id: req.national_id,
        name: req.name,
        email: req.email,
        semester: req.semester,
        is_deleted: false,
    })
}

pub async fn fetch_students(
    db: &SqlitePool,
    params: &StudentQueryParams,
) -> Result<Vec<Student>, AppError> {
    let page = params.page()?;

    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM students WHERE 1 = 1");
    if !params.include_deleted {
        query.push(" AND is_deleted = 0");
    }
    if let Some(semester) = params.semester {
        query.push(" AND semester = ").push_bind(semester);
    }
    if let Some(name) = &params.name {
        push_contains(&mut query, "name", name);
    }
    query
        .push(" ORDER BY id LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.skip);

    let mut tx = db.begin().await?;
    let students = query.build_query_as::<Student>().fetch_all(&mut *tx).await?;
    tx.commit().await?;
    Ok(students)
}

/// Non-deleted students whose name contains `name`. An empty result is
/// reported as `NotFound`.
pub async fn search_students(db: &SqlitePool, name: &str) -> Result<Vec<Student>, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let mut query =
        QueryBuilder::<Sqlite>::new("SELECT * FROM students WHERE is_deleted = 0");
    push_contains(&mut query, "name", name);
    query.push(" ORDER BY id");

    let mut tx = db.begin().await?;
    let students = query.build_query_as::<Student>().fetch_all(&mut *tx).await?;
    tx.commit().await?;

    if students.is_empty() {
        return Err(AppError::NotFound(format!("no students match '{}'", name)));
    }
    Ok(students)
}

pub async fn update_student(
    db: &SqlitePool,
    id: i64,
    req: UpdateStudentRequest,
) -> Result<Student, AppError> {
    req.validate()?;

    let mut tx = db.begin().await?;
    let mut current = find_active::<Student>(&mut tx, id).await?;
    req.apply_to(&mut current);

    sqlx::query(
        r#"
        UPDATE students
        SET national_id = ?1,
            name = ?2,
            email = ?3,
            semester = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&current.national_id)
    .bind(&current.name)
    .bind(&current.email)
    .bind(current.semester)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, || duplicate_national_id(&current.national_id)))?;
    tx.commit().await?;

    info!("updated student {}", id);
    Ok(current)
}
