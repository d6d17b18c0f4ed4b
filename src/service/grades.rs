use super::validation;
use crate::error::{AppError, FieldError};
use crate::model::{Course, Grade, GradeUpdate, NewGrade, Page, Student};
use crate::repo::{self, grades};
use crate::sql::Catalog;
use sqlx::{PgConnection, PgPool};

pub struct GradeService;

impl GradeService {
    pub async fn create(pool: &PgPool, catalog: &Catalog, input: &NewGrade) -> Result<Grade, AppError> {
        let fields = validation::new_grade(input)?;
        let mut tx = pool.begin().await?;

        let mut missing = Vec::new();
        if repo::find::<Student>(&mut tx, &catalog.students, fields.student_id).await?.is_none() {
            missing.push(FieldError::new(
                "student_id",
                format!("student {} does not exist", fields.student_id),
            ));
        }
        if repo::find::<Course>(&mut tx, &catalog.courses, fields.course_id).await?.is_none() {
            missing.push(FieldError::new(
                "course_id",
                format!("course {} does not exist", fields.course_id),
            ));
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(missing));
        }

        Self::ensure_no_duplicate(&mut tx, catalog, fields.student_id, fields.course_id, &fields.semester, 0).await?;
        let row = grades::insert(&mut tx, &catalog.grades, &fields).await?;
        tx.commit().await?;
        tracing::info!(
            id = row.id,
            student_id = row.student_id,
            course_id = row.course_id,
            "grade created"
        );
        Ok(row)
    }

    pub async fn get(pool: &PgPool, catalog: &Catalog, id: i64) -> Result<Grade, AppError> {
        let mut conn = pool.acquire().await?;
        repo::find(&mut conn, &catalog.grades, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(pool: &PgPool, catalog: &Catalog, page: Page) -> Result<Vec<Grade>, AppError> {
        let mut conn = pool.acquire().await?;
        repo::page(&mut conn, &catalog.grades, page.limit.into(), page.offset.into()).await
    }

    /// Every grade of one student, ordered by id. 404 when the student does not exist.
    pub async fn list_by_student(pool: &PgPool, catalog: &Catalog, student_id: i64) -> Result<Vec<Grade>, AppError> {
        let mut tx = pool.begin().await?;
        if repo::find::<Student>(&mut tx, &catalog.students, student_id).await?.is_none() {
            return Err(AppError::NotFound(format!("student {}", student_id)));
        }
        let rows = repo::find_where(&mut tx, &catalog.grades, "student_id", student_id).await?;
        tx.commit().await?;
        Ok(rows)
    }

    /// Every grade in one course, ordered by id. 404 when the course does not exist.
    pub async fn list_by_course(pool: &PgPool, catalog: &Catalog, course_id: i64) -> Result<Vec<Grade>, AppError> {
        let mut tx = pool.begin().await?;
        if repo::find::<Course>(&mut tx, &catalog.courses, course_id).await?.is_none() {
            return Err(AppError::NotFound(format!("course {}", course_id)));
        }
        let rows = repo::find_where(&mut tx, &catalog.grades, "course_id", course_id).await?;
        tx.commit().await?;
        Ok(rows)
    }

    pub async fn update(pool: &PgPool, catalog: &Catalog, id: i64, input: &GradeUpdate) -> Result<Grade, AppError> {
        let changes = validation::grade_changes(input)?;
        let mut tx = pool.begin().await?;
        let current: Grade = repo::find(&mut tx, &catalog.grades, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        if let Some(semester) = &changes.semester {
            Self::ensure_no_duplicate(&mut tx, catalog, current.student_id, current.course_id, semester, id).await?;
        }
        let row = grades::update(&mut tx, &catalog.grades, id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        tx.commit().await?;
        tracing::info!(id, "grade updated");
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, catalog: &Catalog, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        if !repo::delete(&mut tx, &catalog.grades, id).await? {
            return Err(not_found(id));
        }
        tx.commit().await?;
        tracing::info!(id, "grade deleted");
        Ok(())
    }

    async fn ensure_no_duplicate(
        conn: &mut PgConnection,
        catalog: &Catalog,
        student_id: i64,
        course_id: i64,
        semester: &str,
        own_id: i64,
    ) -> Result<(), AppError> {
        if grades::duplicate_exists(conn, &catalog.grades, student_id, course_id, semester, own_id).await? {
            return Err(AppError::invalid(
                "semester",
                format!(
                    "student {} already has a grade in course {} for semester {}",
                    student_id, course_id, semester
                ),
            ));
        }
        Ok(())
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("grade {}", id))
}
