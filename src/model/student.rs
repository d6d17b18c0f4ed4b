use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, FromRow, ToSchema, Debug, Clone, PartialEq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Enrollment code, unique per student and distinct from `id`.
    pub enrollment: String,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /students`.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct NewStudent {
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "matricula")]
    pub enrollment: Option<String>,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    #[serde(default, alias = "data_nascimento")]
    pub birth_date: Option<String>,
}

/// Body of `PUT /students/{id}`. Absent fields are left unchanged.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct StudentUpdate {
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "matricula")]
    pub enrollment: Option<String>,
    #[serde(default, alias = "data_nascimento")]
    pub birth_date: Option<String>,
}

/// Validated student columns, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentFields {
    pub name: String,
    pub email: String,
    pub enrollment: String,
    pub birth_date: Option<NaiveDate>,
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub enrollment: Option<String>,
    pub birth_date: Option<NaiveDate>,
}
