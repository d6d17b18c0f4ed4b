//! Persistence: row-level reads and writes. Every function runs on the caller's connection,
//! normally an open transaction, so a service operation commits or rolls back as a whole.

pub mod courses;
pub mod grades;
pub mod students;

use crate::error::AppError;
use crate::sql::{self, Table};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection};

/// Fetch one row by id.
pub async fn find<T>(conn: &mut PgConnection, table: &Table, id: i64) -> Result<Option<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let q = sql::select_by_id(table);
    tracing::debug!(sql = %q, id, "query");
    let row = sqlx::query_as::<_, T>(&q).bind(id).fetch_optional(&mut *conn).await?;
    Ok(row)
}

/// One page ordered by id.
pub async fn page<T>(conn: &mut PgConnection, table: &Table, limit: i64, offset: i64) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let q = sql::select_page(table);
    tracing::debug!(sql = %q, limit, offset, "query");
    let rows = sqlx::query_as::<_, T>(&q)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// All rows whose `column` equals `value`, ordered by id.
pub async fn find_where<T>(conn: &mut PgConnection, table: &Table, column: &str, value: i64) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let q = sql::select_where(table, column);
    tracing::debug!(sql = %q, value, "query");
    let rows = sqlx::query_as::<_, T>(&q).bind(value).fetch_all(&mut *conn).await?;
    Ok(rows)
}

/// Whether a row other than `except_id` already holds `value` in `column`.
pub async fn taken_by_other(
    conn: &mut PgConnection,
    table: &Table,
    column: &str,
    value: &str,
    except_id: i64,
) -> Result<bool, AppError> {
    let q = sql::exists_other(table, column);
    tracing::debug!(sql = %q, value, except_id, "query");
    let (exists,): (bool,) = sqlx::query_as(&q)
        .bind(value)
        .bind(except_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

pub async fn count_where(conn: &mut PgConnection, table: &Table, column: &str, value: i64) -> Result<i64, AppError> {
    let q = sql::count_where(table, column);
    tracing::debug!(sql = %q, value, "query");
    let (n,): (i64,) = sqlx::query_as(&q).bind(value).fetch_one(&mut *conn).await?;
    Ok(n)
}

/// Delete by id. Returns whether a row was removed.
pub async fn delete(conn: &mut PgConnection, table: &Table, id: i64) -> Result<bool, AppError> {
    let q = sql::delete(table);
    tracing::debug!(sql = %q, id, "query");
    let done = sqlx::query(&q).bind(id).execute(&mut *conn).await?;
    Ok(done.rows_affected() > 0)
}

/// Delete every row whose `column` equals `value`. Returns the number removed.
pub async fn delete_where(conn: &mut PgConnection, table: &Table, column: &str, value: i64) -> Result<u64, AppError> {
    let q = sql::delete_where(table, column);
    tracing::debug!(sql = %q, value, "query");
    let done = sqlx::query(&q).bind(value).execute(&mut *conn).await?;
    Ok(done.rows_affected())
}
