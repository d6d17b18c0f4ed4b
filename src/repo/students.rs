use crate::error::AppError;
use crate::model::{Student, StudentChanges, StudentFields};
use crate::sql::{self, Table};
use sqlx::PgConnection;

pub async fn insert(conn: &mut PgConnection, table: &Table, f: &StudentFields) -> Result<Student, AppError> {
    let q = sql::insert(table);
    tracing::debug!(sql = %q, "query");
    let row = sqlx::query_as::<_, Student>(&q)
        .bind(&f.name)
        .bind(&f.email)
        .bind(&f.enrollment)
        .bind(f.birth_date)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn update(
    conn: &mut PgConnection,
    table: &Table,
    id: i64,
    c: &StudentChanges,
) -> Result<Option<Student>, AppError> {
    let q = sql::update_partial(table, table.columns);
    tracing::debug!(sql = %q, id, "query");
    let row = sqlx::query_as::<_, Student>(&q)
        .bind(id)
        .bind(c.name.as_deref())
        .bind(c.email.as_deref())
        .bind(c.enrollment.as_deref())
        .bind(c.birth_date)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}
