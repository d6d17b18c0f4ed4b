use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, FromRow, ToSchema, Debug, Clone, PartialEq)]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub score: f64,
    /// Year and half-year, e.g. `2024.1`.
    pub semester: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct NewGrade {
    #[serde(default, alias = "aluno_id")]
    pub student_id: Option<i64>,
    #[serde(default, alias = "disciplina_id")]
    pub course_id: Option<i64>,
    #[serde(default, alias = "valor")]
    pub score: Option<f64>,
    #[serde(default, alias = "semestre")]
    pub semester: Option<String>,
}

/// Body of `PUT /grades/{id}`. The student and course of a grade are fixed once recorded.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct GradeUpdate {
    #[serde(default, alias = "valor")]
    pub score: Option<f64>,
    #[serde(default, alias = "semestre")]
    pub semester: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeFields {
    pub student_id: i64,
    pub course_id: i64,
    pub score: f64,
    pub semester: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeChanges {
    pub score: Option<f64>,
    pub semester: Option<String>,
}

/// A grade with its student and course resolved to names, as listed and exported by the client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub student_name: String,
    pub course_name: String,
    pub score: f64,
    pub semester: String,
}
