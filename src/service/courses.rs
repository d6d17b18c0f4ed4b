use super::{release_grades, validation};
use crate::config::DeletePolicy;
use crate::error::AppError;
use crate::model::{Course, CourseUpdate, NewCourse, Page};
use crate::repo::{self, courses};
use crate::sql::Catalog;
use sqlx::{PgConnection, PgPool};

pub struct CourseService;

impl CourseService {
    pub async fn create(pool: &PgPool, catalog: &Catalog, input: &NewCourse) -> Result<Course, AppError> {
        let fields = validation::new_course(input)?;
        let mut tx = pool.begin().await?;
        Self::ensure_code_free(&mut tx, catalog, &fields.code, 0).await?;
        let row = courses::insert(&mut tx, &catalog.courses, &fields).await?;
        tx.commit().await?;
        tracing::info!(id = row.id, code = %row.code, "course created");
        Ok(row)
    }

    pub async fn get(pool: &PgPool, catalog: &Catalog, id: i64) -> Result<Course, AppError> {
        let mut conn = pool.acquire().await?;
        repo::find(&mut conn, &catalog.courses, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(pool: &PgPool, catalog: &Catalog, page: Page) -> Result<Vec<Course>, AppError> {
        let mut conn = pool.acquire().await?;
        repo::page(&mut conn, &catalog.courses, page.limit.into(), page.offset.into()).await
    }

    pub async fn update(pool: &PgPool, catalog: &Catalog, id: i64, input: &CourseUpdate) -> Result<Course, AppError> {
        let changes = validation::course_changes(input)?;
        let mut tx = pool.begin().await?;
        if repo::find::<Course>(&mut tx, &catalog.courses, id).await?.is_none() {
            return Err(not_found(id));
        }
        if let Some(code) = &changes.code {
            Self::ensure_code_free(&mut tx, catalog, code, id).await?;
        }
        let row = courses::update(&mut tx, &catalog.courses, id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        tx.commit().await?;
        tracing::info!(id, "course updated");
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, catalog: &Catalog, policy: DeletePolicy, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        if repo::find::<Course>(&mut tx, &catalog.courses, id).await?.is_none() {
            return Err(not_found(id));
        }
        release_grades(&mut tx, catalog, policy, "course", "course_id", id).await?;
        repo::delete(&mut tx, &catalog.courses, id).await?;
        tx.commit().await?;
        tracing::info!(id, "course deleted");
        Ok(())
    }

    async fn ensure_code_free(conn: &mut PgConnection, catalog: &Catalog, code: &str, own_id: i64) -> Result<(), AppError> {
        if repo::taken_by_other(conn, &catalog.courses, "code", code, own_id).await? {
            return Err(AppError::invalid("code", format!("code {} is already registered", code)));
        }
        Ok(())
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("course {}", id))
}
