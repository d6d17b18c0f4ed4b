use crate::error::AppError;
use crate::model::{Course, CourseChanges, CourseFields};
use crate::sql::{self, Table};
use sqlx::PgConnection;

pub async fn insert(conn: &mut PgConnection, table: &Table, f: &CourseFields) -> Result<Course, AppError> {
    let q = sql::insert(table);
    tracing::debug!(sql = %q, "query");
    let row = sqlx::query_as::<_, Course>(&q)
        .bind(&f.code)
        .bind(&f.name)
        .bind(f.workload)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn update(
    conn: &mut PgConnection,
    table: &Table,
    id: i64,
    c: &CourseChanges,
) -> Result<Option<Course>, AppError> {
    let q = sql::update_partial(table, table.columns);
    tracing::debug!(sql = %q, id, "query");
    let row = sqlx::query_as::<_, Course>(&q)
        .bind(id)
        .bind(c.code.as_deref())
        .bind(c.name.as_deref())
        .bind(c.workload)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}
