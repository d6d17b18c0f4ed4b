//! Create the schema, tables and indexes. Every statement is idempotent (IF NOT EXISTS), so this
//! runs on every start.

use crate::error::AppError;
use crate::sql::{quoted, Catalog};
use sqlx::PgPool;

/// DDL statements in dependency order: schema, students, courses, grades, indexes.
pub fn schema_statements(catalog: &Catalog) -> Vec<String> {
    let students = catalog.students.qualified();
    let courses = catalog.courses.qualified();
    let grades = catalog.grades.qualified();
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&catalog.schema)),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                email VARCHAR(100) NOT NULL UNIQUE,
                enrollment VARCHAR(20) NOT NULL UNIQUE,
                birth_date DATE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            students
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                code VARCHAR(20) NOT NULL UNIQUE,
                name VARCHAR(100) NOT NULL,
                workload INTEGER NOT NULL CHECK (workload > 0),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            courses
        ),
        // Foreign keys are plain (no ON DELETE action): the delete policy is applied by the
        // services inside the deleting transaction.
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                student_id BIGINT NOT NULL REFERENCES {} (id),
                course_id BIGINT NOT NULL REFERENCES {} (id),
                score DOUBLE PRECISION NOT NULL CHECK (score >= 0 AND score <= 10),
                semester VARCHAR(10) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                UNIQUE (student_id, course_id, semester)
            )
            "#,
            grades, students, courses
        ),
        format!("CREATE INDEX IF NOT EXISTS grades_student_id_idx ON {} (student_id)", grades),
        format!("CREATE INDEX IF NOT EXISTS grades_course_id_idx ON {} (course_id)", grades),
        format!("CREATE INDEX IF NOT EXISTS students_name_idx ON {} (name)", students),
    ]
}

/// Apply the schema in one transaction.
pub async fn apply_migrations(pool: &PgPool, catalog: &Catalog) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for ddl in schema_statements(catalog) {
        tracing::debug!(sql = %ddl.trim(), "migration");
        sqlx::query(&ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(schema = %catalog.schema, "schema ready");
    Ok(())
}
