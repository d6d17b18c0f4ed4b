use super::{release_grades, today, validation};
use crate::config::DeletePolicy;
use crate::error::{AppError, FieldError};
use crate::model::{NewStudent, Page, Student, StudentUpdate};
use crate::repo::{self, students};
use crate::sql::Catalog;
use sqlx::{PgConnection, PgPool};

pub struct StudentService;

impl StudentService {
    pub async fn create(pool: &PgPool, catalog: &Catalog, input: &NewStudent) -> Result<Student, AppError> {
        let fields = validation::new_student(input, today())?;
        let mut tx = pool.begin().await?;
        Self::ensure_unique(&mut tx, catalog, Some(&fields.email), Some(&fields.enrollment), 0).await?;
        let row = students::insert(&mut tx, &catalog.students, &fields).await?;
        tx.commit().await?;
        tracing::info!(id = row.id, enrollment = %row.enrollment, "student created");
        Ok(row)
    }

    pub async fn get(pool: &PgPool, catalog: &Catalog, id: i64) -> Result<Student, AppError> {
        let mut conn = pool.acquire().await?;
        repo::find(&mut conn, &catalog.students, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(pool: &PgPool, catalog: &Catalog, page: Page) -> Result<Vec<Student>, AppError> {
        let mut conn = pool.acquire().await?;
        repo::page(&mut conn, &catalog.students, page.limit.into(), page.offset.into()).await
    }

    pub async fn update(
        pool: &PgPool,
        catalog: &Catalog,
        id: i64,
        input: &StudentUpdate,
    ) -> Result<Student, AppError> {
        let changes = validation::student_changes(input, today())?;
        let mut tx = pool.begin().await?;
        if repo::find::<Student>(&mut tx, &catalog.students, id).await?.is_none() {
            return Err(not_found(id));
        }
        Self::ensure_unique(
            &mut tx,
            catalog,
            changes.email.as_deref(),
            changes.enrollment.as_deref(),
            id,
        )
        .await?;
        let row = students::update(&mut tx, &catalog.students, id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        tx.commit().await?;
        tracing::info!(id, "student updated");
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, catalog: &Catalog, policy: DeletePolicy, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        if repo::find::<Student>(&mut tx, &catalog.students, id).await?.is_none() {
            return Err(not_found(id));
        }
        release_grades(&mut tx, catalog, policy, "student", "student_id", id).await?;
        repo::delete(&mut tx, &catalog.students, id).await?;
        tx.commit().await?;
        tracing::info!(id, "student deleted");
        Ok(())
    }

    /// Email and enrollment must not belong to any student other than `own_id` (0 on create).
    async fn ensure_unique(
        conn: &mut PgConnection,
        catalog: &Catalog,
        email: Option<&str>,
        enrollment: Option<&str>,
        own_id: i64,
    ) -> Result<(), AppError> {
        let mut taken = Vec::new();
        if let Some(email) = email {
            if repo::taken_by_other(conn, &catalog.students, "email", email, own_id).await? {
                taken.push(FieldError::new("email", format!("email {} is already registered", email)));
            }
        }
        if let Some(enrollment) = enrollment {
            if repo::taken_by_other(conn, &catalog.students, "enrollment", enrollment, own_id).await? {
                taken.push(FieldError::new(
                    "enrollment",
                    format!("enrollment {} is already registered", enrollment),
                ));
            }
        }
        if taken.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(taken))
        }
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("student {}", id))
}
