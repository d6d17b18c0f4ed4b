//! Entity services: validation plus persistence, one transaction per operation.

mod courses;
mod grades;
mod students;
pub mod validation;

pub use courses::CourseService;
pub use grades::GradeService;
pub use students::StudentService;

use crate::config::DeletePolicy;
use crate::error::AppError;
use crate::repo;
use crate::sql::Catalog;
use sqlx::PgConnection;

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Apply the referential policy to the grades that reference `id` through `column`.
/// Cascade deletes them; restrict fails while any exist.
async fn release_grades(
    conn: &mut PgConnection,
    catalog: &Catalog,
    policy: DeletePolicy,
    kind: &str,
    column: &str,
    id: i64,
) -> Result<(), AppError> {
    let dependents = repo::count_where(conn, &catalog.grades, column, id).await?;
    if dependents == 0 {
        return Ok(());
    }
    match policy {
        DeletePolicy::Restrict => {
            tracing::warn!(kind, id, dependents, "delete blocked by dependent grades");
            Err(AppError::Conflict(format!(
                "{} {} has {} grade(s) recorded",
                kind, id, dependents
            )))
        }
        DeletePolicy::Cascade => {
            let removed = repo::delete_where(conn, &catalog.grades, column, id).await?;
            tracing::info!(kind, id, removed, "cascaded grade delete");
            Ok(())
        }
    }
}
