use crate::error::AppError;
use crate::model::{Grade, GradeChanges, GradeFields};
use crate::sql::{self, quoted, Table};
use sqlx::PgConnection;

/// Columns a grade update may touch; student and course stay fixed.
const MUTABLE: &[&str] = &["score", "semester"];

pub async fn insert(conn: &mut PgConnection, table: &Table, f: &GradeFields) -> Result<Grade, AppError> {
    let q = sql::insert(table);
    tracing::debug!(sql = %q, "query");
    let row = sqlx::query_as::<_, Grade>(&q)
        .bind(f.student_id)
        .bind(f.course_id)
        .bind(f.score)
        .bind(&f.semester)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn update(
    conn: &mut PgConnection,
    table: &Table,
    id: i64,
    c: &GradeChanges,
) -> Result<Option<Grade>, AppError> {
    let q = sql::update_partial(table, MUTABLE);
    tracing::debug!(sql = %q, id, "query");
    let row = sqlx::query_as::<_, Grade>(&q)
        .bind(id)
        .bind(c.score)
        .bind(c.semester.as_deref())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

/// Whether a grade other than `except_id` exists for the same student, course and semester.
pub async fn duplicate_exists(
    conn: &mut PgConnection,
    table: &Table,
    student_id: i64,
    course_id: i64,
    semester: &str,
    except_id: i64,
) -> Result<bool, AppError> {
    let q = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND {} = $2 AND {} = $3 AND {} <> $4)",
        table.qualified(),
        quoted("student_id"),
        quoted("course_id"),
        quoted("semester"),
        quoted("id")
    );
    tracing::debug!(sql = %q, student_id, course_id, semester, "query");
    let (exists,): (bool,) = sqlx::query_as(&q)
        .bind(student_id)
        .bind(course_id)
        .bind(semester)
        .bind(except_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}
