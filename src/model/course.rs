use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, FromRow, ToSchema, Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// Credit-hour load.
    pub workload: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct NewCourse {
    #[serde(default, alias = "codigo")]
    pub code: Option<String>,
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    #[serde(default, alias = "carga_horaria")]
    pub workload: Option<i64>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct CourseUpdate {
    #[serde(default, alias = "codigo")]
    pub code: Option<String>,
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    #[serde(default, alias = "carga_horaria")]
    pub workload: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseFields {
    pub code: String,
    pub name: String,
    pub workload: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseChanges {
    pub code: Option<String>,
    pub name: Option<String>,
    pub workload: Option<i32>,
}
